//! Upload analysis pipeline
//!
//! parse → clean → (maybe) train → predict → chart → summarize.
//!
//! The steps are split so the server can take the model lock only around
//! the parts that need it: [`Upload::parse`] does all the work that is
//! independent of the model, [`ModelState::fit_once`] trains, and
//! [`Upload::report`] predicts and assembles the payload.

use std::collections::BTreeMap;

use ndarray::Array1;
use serde::Serialize;
use tracing::info;

use crate::data::{Dataset, ID_COLUMN, LABEL_COLUMN, NAME_COLUMN, SEX_COLUMN};
use crate::error::Result;
use crate::preprocessing::{extract_labels, prepare_features, FeatureMatrix};
use crate::training::{ModelState, Predictions};
use crate::visualization::{sex_survival_chart, SEX_SURVIVAL_CHART};

/// Default number of rows returned as prediction records
pub const DEFAULT_PREDICTION_LIMIT: usize = 100;

/// Aggregate outcome counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Rows that received a prediction
    pub total: usize,
    pub survived: usize,
    pub deceased: usize,
    /// Rows in the upload
    pub rows: usize,
    pub model_trained: bool,
}

/// One predicted row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    #[serde(rename = "PassengerId")]
    pub passenger_id: serde_json::Value,
    #[serde(rename = "Name")]
    pub name: serde_json::Value,
    #[serde(rename = "Predicted_Outcome")]
    pub predicted_outcome: u8,
    #[serde(rename = "Survival_Probability")]
    pub survival_probability: f64,
}

/// Full response payload
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub summary: Summary,
    pub predictions: Vec<PredictionRecord>,
    /// Chart name → base64-encoded SVG
    pub charts: BTreeMap<String, String>,
}

/// A parsed and cleaned upload
#[derive(Debug, Clone)]
pub struct Upload {
    dataset: Dataset,
    features: FeatureMatrix,
    sex: Vec<Option<String>>,
}

impl Upload {
    /// Parse CSV bytes and build the cleaned feature matrix
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let dataset = Dataset::from_csv_bytes(bytes)?;
        Self::from_dataset(dataset)
    }

    pub fn from_dataset(dataset: Dataset) -> Result<Self> {
        let features = prepare_features(&dataset)?;
        let sex = dataset.string_column(SEX_COLUMN)?;
        Ok(Self {
            dataset,
            features,
            sex,
        })
    }

    /// Whether the upload carries the label column
    pub fn has_labels(&self) -> bool {
        self.dataset.has_column(LABEL_COLUMN)
    }

    /// Training labels; fails if the column is absent or not 0/1
    pub fn labels(&self) -> Result<Array1<f64>> {
        extract_labels(&self.dataset)
    }

    /// Train the model from this upload if it has labels and nothing is
    /// trained yet. Returns whether training happened.
    pub fn train_if_needed(&self, state: &mut ModelState) -> Result<bool> {
        if !self.has_labels() || state.is_trained() {
            return Ok(false);
        }
        let labels = self.labels()?;
        state.fit_once(&self.features, &labels)
    }

    /// Predict (when a model is available) and assemble the payload
    pub fn report(&self, state: &ModelState, prediction_limit: usize) -> Result<AnalysisReport> {
        let predictions = state.predict(&self.features)?;

        let records = match &predictions {
            Some(p) => self.records(p, prediction_limit),
            None => Vec::new(),
        };

        let chart = sex_survival_chart(&self.sex, predictions.as_ref().map(|p| p.classes.as_slice()))?;
        let mut charts = BTreeMap::new();
        charts.insert(SEX_SURVIVAL_CHART.to_string(), chart);

        let (total, survived) = match &predictions {
            Some(p) => (p.count(), p.positives()),
            None => (0, 0),
        };
        let summary = Summary {
            total,
            survived,
            deceased: total - survived,
            rows: self.dataset.height(),
            model_trained: state.is_trained(),
        };

        info!(
            rows = summary.rows,
            predicted = summary.total,
            survived = summary.survived,
            deceased = summary.deceased,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            summary,
            predictions: records,
            charts,
        })
    }

    fn records(&self, predictions: &Predictions, limit: usize) -> Vec<PredictionRecord> {
        let ids = self.dataset.display_column(ID_COLUMN);
        let names = self.dataset.display_column(NAME_COLUMN);
        let na = || serde_json::Value::String("N/A".to_string());

        predictions
            .classes
            .iter()
            .zip(&predictions.probabilities)
            .take(limit)
            .enumerate()
            .map(|(i, (class, proba))| PredictionRecord {
                passenger_id: ids.as_ref().and_then(|v| v.get(i).cloned()).unwrap_or_else(na),
                name: names.as_ref().and_then(|v| v.get(i).cloned()).unwrap_or_else(na),
                predicted_outcome: *class,
                survival_probability: *proba,
            })
            .collect()
    }
}

/// Run the whole pipeline against a model state
pub fn analyze(bytes: &[u8], state: &mut ModelState, prediction_limit: usize) -> Result<AnalysisReport> {
    let upload = Upload::parse(bytes)?;
    upload.train_if_needed(state)?;
    upload.report(state, prediction_limit)
}
