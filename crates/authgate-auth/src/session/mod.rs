//! Session lifecycle management including creation, refresh bookkeeping,
//! and revocation.

pub mod manager;
pub mod store;

pub use manager::{LoginResult, RefreshOutcome, SessionManager};
pub use store::{Session, SessionStore};
