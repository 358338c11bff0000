//! Shared domain types.

pub mod principal;

pub use principal::Principal;
