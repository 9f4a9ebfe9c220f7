use thiserror::Error;

/// Errors from mapping operations.
#[derive(Debug, Error)]
pub enum MapError {
    /// Source column could not be selected or converted.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for MapError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
