//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::InsightError;

#[derive(Error, Debug)]
pub enum ServerError {
    /// Client input problem (missing or empty upload)
    #[error("{0}")]
    BadRequest(String),

    /// Parsing, cleaning, training, prediction or charting failed
    #[error("An error occurred on the server: {0}")]
    Processing(#[from] InsightError),

    /// The blocking parse task died before producing a result
    #[error("An error occurred on the server: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Processing(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ServerError::Processing(e) => tracing::error!(detail = %e, "Analysis failed"),
            ServerError::Internal(msg) => tracing::error!(detail = %msg, "Internal server error"),
            ServerError::BadRequest(msg) => tracing::warn!(detail = %msg, "Rejected request"),
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
