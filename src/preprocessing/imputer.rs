//! Median imputation over a feature matrix

use crate::error::{InsightError, Result};
use ndarray::{Array1, Array2, Axis};

/// Check if value is missing (NaN)
#[inline]
pub fn is_missing(v: f64) -> bool {
    v.is_nan()
}

/// Median of the observed values, averaging the two middle values for an
/// even count. `None` when nothing is observed.
pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut observed: Vec<f64> = values.into_iter().filter(|v| !is_missing(*v)).collect();
    if observed.is_empty() {
        return None;
    }
    observed.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = observed.len() / 2;
    if observed.len() % 2 == 0 {
        Some((observed[mid - 1] + observed[mid]) / 2.0)
    } else {
        Some(observed[mid])
    }
}

/// Trait for imputers
pub trait Imputer {
    /// Fit the imputer on data with missing values
    fn fit(&mut self, x: &Array2<f64>) -> Result<()>;

    /// Transform data by imputing missing values
    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    /// Fit and transform in one step
    fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}

/// Replaces NaN cells with the median of their column
#[derive(Debug, Clone)]
pub struct MedianImputer {
    /// Column names, used in error messages
    columns: Vec<String>,
    medians: Option<Array1<f64>>,
}

impl MedianImputer {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            medians: None,
        }
    }

    fn column_name(&self, idx: usize) -> String {
        self.columns
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("column_{}", idx))
    }
}

impl Imputer for MedianImputer {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        let mut medians = Array1::zeros(x.ncols());
        for (j, col) in x.axis_iter(Axis(1)).enumerate() {
            medians[j] = median(col.iter().copied())
                .ok_or_else(|| InsightError::EmptyColumn(self.column_name(j)))?;
        }
        self.medians = Some(medians);
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let medians = self.medians.as_ref().ok_or(InsightError::ModelNotFitted)?;
        if medians.len() != x.ncols() {
            return Err(InsightError::ShapeError {
                expected: format!("{} columns", medians.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let mut out = x.clone();
        for (j, mut col) in out.axis_iter_mut(Axis(1)).enumerate() {
            col.mapv_inplace(|v| if is_missing(v) { medians[j] } else { v });
        }
        Ok(out)
    }
}
