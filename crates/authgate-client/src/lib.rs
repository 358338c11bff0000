//! # authgate-client
//!
//! Client half of the AuthGate protocol: holds the current access
//! credential in an observable state cell and wraps outbound requests so
//! that credential expiry is transparent to callers. Any number of
//! concurrently failing requests trigger exactly one refresh round-trip.
//!
//! The refresh token never appears here; it lives in the HTTP client's
//! cookie jar and is only ever transmitted to the auth endpoints.

pub mod coordinator;
pub mod error;
pub mod state;

pub use coordinator::AuthClient;
pub use error::ClientError;
pub use state::{AuthSnapshot, AuthState};
