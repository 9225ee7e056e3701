//! Uploaded dataset handling
//!
//! Wraps a polars [`DataFrame`] parsed from raw CSV bytes and exposes the
//! column accessors the analysis pipeline needs: numeric columns with
//! missing values as `None`, string columns, and identity columns rendered
//! as JSON values.

use crate::error::{InsightError, Result};
use polars::prelude::*;
use std::io::Cursor;

/// Passenger identifier column
pub const ID_COLUMN: &str = "PassengerId";
/// Passenger name column
pub const NAME_COLUMN: &str = "Name";
/// Binary categorical column used both as a feature and as the chart axis
pub const SEX_COLUMN: &str = "Sex";
/// Label column, only used for training
pub const LABEL_COLUMN: &str = "Survived";

/// Rows used for schema inference when parsing CSV uploads
const INFER_SCHEMA_ROWS: usize = 1000;

/// A tabular dataset built from one upload
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
}

impl Dataset {
    /// Parse CSV bytes (header row required) into a dataset
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| InsightError::DataError(format!("upload is not valid UTF-8: {}", e)))?;

        if text.trim().is_empty() {
            return Err(InsightError::DataError("no columns to parse from file".to_string()));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .into_reader_with_file_handle(Cursor::new(text.as_bytes()))
            .finish()?;

        Ok(Self { df })
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    fn series(&self, name: &str) -> Result<&Series> {
        self.df
            .column(name)
            .map(|column| column.as_materialized_series())
            .map_err(|_| InsightError::MissingColumn(name.to_string()))
    }

    /// Numeric values of a column. Nulls, NaN and values that do not parse as
    /// numbers come back as `None`.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let series = self.series(name)?.cast(&DataType::Float64)?;
        let values = series
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        Ok(values)
    }

    /// String values of a column, with nulls as `None`
    pub fn string_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        let series = self.series(name)?.cast(&DataType::String)?;
        let values = series
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect();
        Ok(values)
    }

    /// Values of an identity column as JSON, or `None` if the column is absent.
    /// Nulls render as `"N/A"`.
    pub fn display_column(&self, name: &str) -> Option<Vec<serde_json::Value>> {
        let series = self.series(name).ok()?;
        let values = (0..series.len())
            .map(|i| match series.get(i) {
                Ok(AnyValue::Int64(v)) => serde_json::json!(v),
                Ok(AnyValue::Int32(v)) => serde_json::json!(v),
                Ok(AnyValue::UInt64(v)) => serde_json::json!(v),
                Ok(AnyValue::UInt32(v)) => serde_json::json!(v),
                Ok(AnyValue::Float64(v)) if v.is_finite() => serde_json::json!(v),
                Ok(AnyValue::Float32(v)) if v.is_finite() => serde_json::json!(v),
                Ok(AnyValue::String(v)) => serde_json::json!(v),
                Ok(AnyValue::StringOwned(v)) => serde_json::json!(v.as_str()),
                Ok(AnyValue::Boolean(v)) => serde_json::json!(v),
                Ok(AnyValue::Null) | Ok(AnyValue::Float64(_)) | Ok(AnyValue::Float32(_)) => {
                    serde_json::json!("N/A")
                }
                Ok(other) => serde_json::json!(other.to_string()),
                Err(_) => serde_json::json!("N/A"),
            })
            .collect();
        Some(values)
    }
}
