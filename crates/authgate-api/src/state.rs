//! Application state shared across all handlers.

use std::sync::Arc;

use authgate_auth::directory::UserDirectory;
use authgate_auth::session::manager::SessionManager;
use authgate_auth::token::decoder::TokenDecoder;
use authgate_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Constructed explicitly at startup (or per test) and passed to every
/// Axum handler via `State<AppState>`. All fields are `Arc`-wrapped for
/// cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Token decoder and validator.
    pub token_decoder: Arc<TokenDecoder>,
    /// Session lifecycle manager (the token service).
    pub session_manager: Arc<SessionManager>,
    /// User directory.
    pub directory: Arc<UserDirectory>,
}
