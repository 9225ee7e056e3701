//! Process-wide model holder

use crate::error::Result;
use crate::preprocessing::FeatureMatrix;
use ndarray::Array1;
use tracing::info;

use super::classifier::{Predictions, SurvivalClassifier};

/// Holds at most one fitted classifier. The first successful fit wins;
/// later fits are ignored.
#[derive(Debug, Default)]
pub struct ModelState {
    classifier: Option<SurvivalClassifier>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_trained(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn classifier(&self) -> Option<&SurvivalClassifier> {
        self.classifier.as_ref()
    }

    /// Fit the classifier unless one is already fitted. Returns whether a
    /// fit took place.
    pub fn fit_once(&mut self, features: &FeatureMatrix, labels: &Array1<f64>) -> Result<bool> {
        if self.classifier.is_some() {
            return Ok(false);
        }

        let classifier = SurvivalClassifier::fit(features, labels)?;
        info!(
            rows = features.nrows(),
            features = ?classifier.feature_names(),
            iterations = classifier.model().n_iter,
            training_accuracy = classifier.training_accuracy(),
            "Model has been trained for this session"
        );
        self.classifier = Some(classifier);
        Ok(true)
    }

    /// Predict with the fitted classifier, or `None` if nothing is fitted
    pub fn predict(&self, features: &FeatureMatrix) -> Result<Option<Predictions>> {
        self.classifier
            .as_ref()
            .map(|clf| clf.predict(features))
            .transpose()
    }
}
