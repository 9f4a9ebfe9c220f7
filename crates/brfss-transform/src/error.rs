//! Error types for table transformations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A stage removed every row.
    #[error("no rows left after {stage}")]
    EmptyTable { stage: &'static str },

    /// Required column is absent from the table.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// Column holds nulls where complete data is required.
    #[error("column '{column}' contains {count} missing values")]
    MissingValues { column: String, count: usize },

    /// Power transform needs strictly positive (box-cox) or > -1 (log) input.
    #[error("{method} transform of '{column}' requires {requirement}, found minimum {minimum}")]
    InvalidDomain {
        column: String,
        method: &'static str,
        requirement: &'static str,
        minimum: f64,
    },

    /// Configured method name is not recognised.
    #[error("unknown {kind} method '{value}' (expected one of: {expected})")]
    UnknownMethod {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransformError::InvalidDomain {
            column: "BMI".to_string(),
            method: "box-cox",
            requirement: "strictly positive values",
            minimum: -0.5,
        };
        assert_eq!(
            err.to_string(),
            "box-cox transform of 'BMI' requires strictly positive values, found minimum -0.5"
        );
    }
}
