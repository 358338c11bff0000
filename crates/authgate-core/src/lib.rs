//! # authgate-core
//!
//! Core crate for AuthGate. Contains configuration schemas, shared domain
//! types, the clock abstraction, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AuthGate crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use error::AppError;
pub use result::AppResult;
pub use types::Principal;
