//! Survival Insight - passenger survival predictions as a web service
//!
//! Upload a passenger CSV, get back per-row survival predictions, outcome
//! counts and a chart as JSON. The first upload that carries a `Survived`
//! column trains the session model; later uploads reuse it.
//!
//! # Modules
//!
//! - [`data`] - CSV ingest into a polars-backed dataset
//! - [`preprocessing`] - median imputation, sex encoding, feature layout
//! - [`training`] - logistic regression and the fit-once model state
//! - [`visualization`] - in-memory bar chart rendering
//! - [`analysis`] - the upload pipeline tying the above together
//! - [`server`] - HTTP server
//! - [`cli`] - command-line interface

pub mod error;

pub mod data;
pub mod preprocessing;
pub mod training;
pub mod visualization;
pub mod analysis;

pub mod server;
pub mod cli;

pub use error::{InsightError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{InsightError, Result};
    pub use crate::data::Dataset;
    pub use crate::preprocessing::{prepare_features, FeatureMatrix, MedianImputer, StandardScaler};
    pub use crate::training::{LogisticRegression, ModelState, Predictions, SurvivalClassifier};
    pub use crate::analysis::{analyze, AnalysisReport, PredictionRecord, Summary, Upload};
    pub use crate::server::{create_router, AppState, ServerConfig};
}
