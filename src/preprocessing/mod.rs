//! Data cleaning and feature preparation
//!
//! Turns an uploaded [`Dataset`] into the feature matrix the classifier
//! consumes:
//! - numeric features get missing values replaced by the column median
//! - `Sex` is encoded as 1 for `"male"` and 0 otherwise
//! - columns are laid out in [`FEATURE_COLUMNS`] order
//!
//! Training and prediction both go through [`prepare_features`], so the
//! layout is identical on both sides.

mod imputer;
mod scaler;

pub use imputer::{is_missing, median, Imputer, MedianImputer};
pub use scaler::StandardScaler;

use crate::data::{Dataset, LABEL_COLUMN, SEX_COLUMN};
use crate::error::{InsightError, Result};
use ndarray::{Array1, Array2};
use tracing::debug;

/// Classifier inputs, in matrix column order
pub const FEATURE_COLUMNS: [&str; 4] = ["Pclass", "Sex", "Age", "Fare"];

/// Features that are read as numbers and median-imputed
pub const NUMERIC_FEATURES: [&str; 3] = ["Pclass", "Age", "Fare"];

/// A named feature matrix
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub names: Vec<String>,
    pub values: Array2<f64>,
}

impl FeatureMatrix {
    pub fn new(names: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if names.len() != values.ncols() {
            return Err(InsightError::ShapeError {
                expected: format!("{} columns", names.len()),
                actual: format!("{} columns", values.ncols()),
            });
        }
        Ok(Self { names, values })
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    /// Index of a named column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// Binary encoding of the sex field: `"male"` is 1, anything else 0
pub fn encode_sex(value: Option<&str>) -> f64 {
    match value {
        Some("male") => 1.0,
        _ => 0.0,
    }
}

/// Build the cleaned feature matrix for a dataset
pub fn prepare_features(dataset: &Dataset) -> Result<FeatureMatrix> {
    let n_rows = dataset.height();
    let mut raw = Array2::from_elem((n_rows, FEATURE_COLUMNS.len()), f64::NAN);

    for (j, name) in FEATURE_COLUMNS.iter().enumerate() {
        if *name == SEX_COLUMN {
            let values = dataset.string_column(name)?;
            for (i, v) in values.iter().enumerate() {
                raw[[i, j]] = encode_sex(v.as_deref());
            }
        } else {
            let values = dataset.numeric_column(name)?;
            for (i, v) in values.iter().enumerate() {
                raw[[i, j]] = v.unwrap_or(f64::NAN);
            }
        }
    }

    let names: Vec<String> = FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect();
    let missing = raw.iter().filter(|v| is_missing(**v)).count();

    let values = if n_rows == 0 {
        raw
    } else {
        MedianImputer::new(names.clone()).fit_transform(&raw)?
    };

    debug!(rows = n_rows, imputed = missing, "Prepared feature matrix");
    FeatureMatrix::new(names, values)
}

/// Training labels from the label column. Every row must be 0 or 1.
pub fn extract_labels(dataset: &Dataset) -> Result<Array1<f64>> {
    let raw = dataset.numeric_column(LABEL_COLUMN)?;
    let mut labels = Array1::zeros(raw.len());

    for (i, v) in raw.iter().enumerate() {
        labels[i] = match v {
            Some(y) if *y == 0.0 || *y == 1.0 => *y,
            Some(y) => {
                return Err(InsightError::InvalidLabels {
                    column: LABEL_COLUMN.to_string(),
                    reason: format!("row {} has value {}, expected 0 or 1", i, y),
                })
            }
            None => {
                return Err(InsightError::InvalidLabels {
                    column: LABEL_COLUMN.to_string(),
                    reason: format!("row {} is missing a label", i),
                })
            }
        };
    }

    Ok(labels)
}
