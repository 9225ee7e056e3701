//! Crate-wide error type

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Column '{0}' has no values to compute a median from")]
    EmptyColumn(String),

    #[error("Invalid labels in '{column}': {reason}")]
    InvalidLabels { column: String, reason: String },

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature mismatch: model was trained on {expected:?}, got {actual:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Model has not been fitted")]
    ModelNotFitted,

    #[error("Chart rendering failed: {0}")]
    ChartError(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, InsightError>;
