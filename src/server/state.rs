//! Application state management

use tokio::sync::RwLock;

use crate::training::ModelState;

use super::ServerConfig;

/// Application state shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    /// The session classifier. Training takes the write lock and re-checks
    /// the trained flag, so only one upload ever trains.
    pub model: RwLock<ModelState>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            model: RwLock::new(ModelState::new()),
            started_at: chrono::Utc::now(),
        }
    }

    pub async fn is_model_trained(&self) -> bool {
        self.model.read().await.is_trained()
    }
}
