//! Model training module
//!
//! - [`LogisticRegression`]: gradient-descent binary classifier
//! - [`SurvivalClassifier`]: scaler + logistic regression bound to a feature layout
//! - [`ModelState`]: fit-once holder shared across requests

mod classifier;
pub mod linear_models;
mod state;

pub use classifier::{Predictions, SurvivalClassifier};
pub use linear_models::LogisticRegression;
pub use state::ModelState;
