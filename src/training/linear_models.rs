//! Binary logistic regression fitted by batch gradient descent

use crate::error::{InsightError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Probability at or above which a row is assigned class 1
pub const DECISION_THRESHOLD: f64 = 0.5;

/// L2-regularized logistic regression over standardized features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// One weight per feature column, `None` until fitted
    pub coefficients: Option<Array1<f64>>,
    pub intercept: f64,
    /// L2 penalty on the weights (not the intercept)
    pub alpha: f64,
    pub max_iter: usize,
    /// Stop once the gradient norm drops below this
    pub tol: f64,
    pub learning_rate: f64,
    /// Gradient steps taken by the last fit
    pub n_iter: usize,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

/// Logistic function, split by sign so `exp` never overflows
fn logistic(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            alpha: 0.01,
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
            n_iter: 0,
        }
    }

    /// Mean log-loss gradient (plus L2 term) at the given parameters
    fn gradient(&self, x: &Array2<f64>, y: &Array1<f64>, w: &Array1<f64>, b: f64) -> (Array1<f64>, f64) {
        let n = x.nrows() as f64;
        let residuals = (x.dot(w) + b).mapv(logistic) - y;

        let mut dw = x.t().dot(&residuals) / n;
        dw.scaled_add(self.alpha, w);
        (dw, residuals.sum() / n)
    }

    /// Fit on a design matrix and 0/1 targets. Refitting starts from zero.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        if x.nrows() != y.len() {
            return Err(InsightError::ShapeError {
                expected: format!("{} targets", x.nrows()),
                actual: format!("{} targets", y.len()),
            });
        }
        if x.nrows() == 0 {
            return Err(InsightError::DataError("cannot fit on an empty dataset".to_string()));
        }

        let mut w = Array1::<f64>::zeros(x.ncols());
        let mut b = 0.0;
        let mut steps = 0;

        while steps < self.max_iter {
            let (dw, db) = self.gradient(x, y, &w, b);
            if dw.dot(&dw) + db * db < self.tol * self.tol {
                break;
            }
            w.scaled_add(-self.learning_rate, &dw);
            b -= self.learning_rate * db;
            steps += 1;
        }

        self.coefficients = Some(w);
        self.intercept = b;
        self.n_iter = steps;
        Ok(self)
    }

    /// P(class = 1) per row
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let w = self.coefficients.as_ref().ok_or(InsightError::ModelNotFitted)?;
        if w.len() != x.ncols() {
            return Err(InsightError::ShapeError {
                expected: format!("{} features", w.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok((x.dot(w) + self.intercept).mapv(logistic))
    }

    /// Fraction of rows whose thresholded probability matches the target
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let proba = self.predict_proba(x)?;
        let hits = proba
            .iter()
            .zip(y.iter())
            .filter(|(p, t)| (**p >= DECISION_THRESHOLD) == (**t >= 0.5))
            .count();
        Ok(hits as f64 / y.len().max(1) as f64)
    }
}
