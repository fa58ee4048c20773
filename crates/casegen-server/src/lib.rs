//! Casegen Server
//!
//! HTTP surface for story hydration from Jira.
//! Exposes story fetch, connection probe and configuration check endpoints.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use casegen_jira::JiraClient;
use config::ServerConfig;
use handlers::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Jira client could not be created
    #[error("Jira client error: {0}")]
    Jira(#[from] casegen_jira::JiraError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Initialize logging.
///
/// Honours `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Start the HTTP server
///
/// Validates the Jira configuration, builds the client and serves until the
/// process is stopped. Missing credentials are logged, not fatal.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing();

    info!("Starting Casegen server");
    info!("Bind address: {}", config.bind_addr());

    let check = config.jira.check();
    for message in check.messages() {
        warn!("{}", message);
    }
    if check.is_ready() {
        info!("Jira site: {}", config.jira.base_url);
    }

    let client = JiraClient::from_config(&config.jira)?;
    let app = create_router(AppState::new(client, check));

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
