//! Error types for XPT file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing XPT files.
#[derive(Debug, Error)]
pub enum XptError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Invalid XPT file format.
    #[error("invalid XPT file: {message}")]
    InvalidFormat { message: String },

    /// Missing required header record.
    #[error("missing header: expected {expected}")]
    MissingHeader { expected: &'static str },

    /// Invalid NAMESTR record.
    #[error("invalid NAMESTR at index {index}: {message}")]
    InvalidNamestr { index: usize, message: String },

    /// Numeric header field could not be parsed.
    #[error("failed to parse numeric field: {field}")]
    NumericParse { field: String },

    /// Value cannot be represented as an IBM float.
    #[error("float conversion error: {message}")]
    FloatConversion { message: String },

    /// Observation data overflow.
    #[error("observation length overflow")]
    ObservationOverflow,

    /// Unexpected trailing bytes.
    #[error("unexpected trailing bytes in observations")]
    TrailingBytes,

    /// Column type the writer cannot encode.
    #[error("column '{name}' has unsupported type {dtype}")]
    UnsupportedColumn { name: String, dtype: String },

    /// Frame construction failed.
    #[error("dataframe error: {message}")]
    DataFrame { message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for XPT operations.
pub type Result<T> = std::result::Result<T, XptError>;

impl XptError {
    pub(crate) fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    pub(crate) fn missing_header(expected: &'static str) -> Self {
        Self::MissingHeader { expected }
    }
}

impl From<polars::prelude::PolarsError> for XptError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}
