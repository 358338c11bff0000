//! AuthGate Server — token lifecycle service
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use authgate_api::state::AppState;
use authgate_auth::directory::UserDirectory;
use authgate_auth::session::manager::SessionManager;
use authgate_auth::session::store::SessionStore;
use authgate_auth::token::decoder::TokenDecoder;
use authgate_auth::token::encoder::TokenEncoder;
use authgate_core::config::AppConfig;
use authgate_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("AUTHGATE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AuthGate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: User directory ───────────────────────────────────
    // Single hardcoded principal; a real deployment would plug a user
    // directory in here.
    let directory = Arc::new(UserDirectory::new());
    let principal = directory.insert("user", "password", "Demo User");
    tracing::info!(principal_id = %principal.id, "Seeded demo principal");

    // ── Step 2: Token codec ──────────────────────────────────────
    let token_encoder = Arc::new(TokenEncoder::new(&config.auth));
    let token_decoder = Arc::new(TokenDecoder::new(&config.auth));

    // ── Step 3: Sessions + token service ─────────────────────────
    let sessions = Arc::new(SessionStore::new());
    let session_manager = Arc::new(SessionManager::new(
        Arc::clone(&token_encoder),
        Arc::clone(&token_decoder),
        Arc::clone(&sessions),
        Arc::clone(&directory),
        &config.auth,
    ));

    // ── Step 4: Build and start HTTP server ──────────────────────
    let app_state = AppState {
        config: Arc::new(config.clone()),
        token_decoder: Arc::clone(&token_decoder),
        session_manager: Arc::clone(&session_manager),
        directory: Arc::clone(&directory),
    };

    let app = authgate_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("AuthGate server listening on {}", addr);

    // ── Step 5: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("AuthGate server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
