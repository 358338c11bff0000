//! Signed token encoding, decoding, and claims management.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod error;

pub use claims::{AccessClaims, RefreshClaims, TokenType};
pub use decoder::TokenDecoder;
pub use encoder::{CredentialPair, TokenEncoder};
pub use error::TokenError;
