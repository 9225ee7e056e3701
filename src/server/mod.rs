//! Survival Insight server module
//!
//! Serves the landing page and the `/analyze` upload endpoint.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::analysis::DEFAULT_PREDICTION_LIMIT;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: Option<String>,
    pub max_upload_size: usize,
    /// Rows returned as prediction records per response
    pub prediction_limit: usize,
    pub cors_origin: Option<String>,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("API_PORT").unwrap_or(8080),
            static_dir: std::env::var("STATIC_DIR").ok(),
            max_upload_size: env_parse("MAX_UPLOAD_SIZE").unwrap_or(16 * 1024 * 1024), // 16MB
            prediction_limit: env_parse("PREDICTION_LIMIT").unwrap_or(DEFAULT_PREDICTION_LIMIT),
            cors_origin: std::env::var("CORS_ORIGIN").ok(),
        }
    }
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();

    if let Some(ref static_dir) = config.static_dir {
        if !std::path::Path::new(static_dir).exists() {
            warn!(static_dir = %static_dir, "Static directory not found, /static will be unavailable");
        }
    }

    let state = Arc::new(AppState::new(config.clone()));
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        address = %addr,
        max_upload_size_mb = config.max_upload_size / 1024 / 1024,
        prediction_limit = config.prediction_limit,
        started_at = %start_time.to_rfc3339(),
        "Survival Insight server starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(url = %format!("http://{}", addr), pid = std::process::id(), "Server listening");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl+c");
            return;
        }
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(uptime_secs = uptime.num_seconds(), "Shutdown signal received, stopping server");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
