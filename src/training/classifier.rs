//! Survival classifier: standard scaling followed by logistic regression

use crate::error::{InsightError, Result};
use crate::preprocessing::{FeatureMatrix, StandardScaler};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::linear_models::{LogisticRegression, DECISION_THRESHOLD};

/// Per-row outputs of a prediction pass
#[derive(Debug, Clone)]
pub struct Predictions {
    /// Predicted class, 0 or 1
    pub classes: Vec<u8>,
    /// Probability of class 1, in [0, 1]
    pub probabilities: Vec<f64>,
}

impl Predictions {
    /// Number of rows predicted
    pub fn count(&self) -> usize {
        self.classes.len()
    }

    /// Number of rows predicted as class 1
    pub fn positives(&self) -> usize {
        self.classes.iter().filter(|c| **c == 1).count()
    }
}

/// A fitted classifier bound to the feature layout it was trained on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurvivalClassifier {
    feature_names: Vec<String>,
    scaler: StandardScaler,
    model: LogisticRegression,
    training_accuracy: f64,
}

impl SurvivalClassifier {
    /// Fit on a feature matrix and 0/1 labels
    pub fn fit(features: &FeatureMatrix, labels: &Array1<f64>) -> Result<Self> {
        let mut scaler = StandardScaler::new();
        let x = scaler.fit_transform(&features.values)?;

        let mut model = LogisticRegression::new();
        model.fit(&x, labels)?;
        let training_accuracy = model.score(&x, labels)?;

        Ok(Self {
            feature_names: features.names.clone(),
            scaler,
            model,
            training_accuracy,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn training_accuracy(&self) -> f64 {
        self.training_accuracy
    }

    pub fn model(&self) -> &LogisticRegression {
        &self.model
    }

    /// Predict class and probability for every row. The matrix must carry the
    /// same feature names, in the same order, as the training matrix.
    pub fn predict(&self, features: &FeatureMatrix) -> Result<Predictions> {
        if features.names != self.feature_names {
            return Err(InsightError::FeatureMismatch {
                expected: self.feature_names.clone(),
                actual: features.names.clone(),
            });
        }

        let x = self.scaler.transform(&features.values)?;
        let probabilities = self.model.predict_proba(&x)?;

        let classes = probabilities
            .iter()
            .map(|p| u8::from(*p >= DECISION_THRESHOLD))
            .collect();

        Ok(Predictions {
            classes,
            probabilities: probabilities.to_vec(),
        })
    }
}
