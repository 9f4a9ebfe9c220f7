//! Error types for survey ingestion.

use std::path::PathBuf;

use brfss_xpt::XptError;
use thiserror::Error;

/// Errors that can occur while locating, downloading or decoding a release.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an extracted file.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Decoding Errors ===
    /// Transport file could not be decoded.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: XptError,
    },

    // === Network Errors ===
    /// Request failed before a response arrived.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a status other than success or not-found.
    #[error("download of {url} failed with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    // === Archive Errors ===
    /// Downloaded archive is not a readable zip.
    #[error("invalid archive from {url}: {message}")]
    Archive { url: String, message: String },

    /// Archive holds no `.xpt` member.
    #[error("archive from {url} contains no transport file")]
    NoTransportMember { url: String },
}

impl IngestError {
    /// Whether the failure is confined to one year's release.
    ///
    /// Corrupt or unexpected content fails the year; the walk may continue.
    /// File system and network failures abort the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Decode { source, .. } => !matches!(source, XptError::Io(_)),
            Self::Archive { .. } | Self::NoTransportMember { .. } => true,
            Self::DirectoryRead { .. }
            | Self::FileWrite { .. }
            | Self::Request { .. }
            | Self::HttpStatus { .. } => false,
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::HttpStatus {
            url: "https://example.org/LLCP2015XPT.zip".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "download of https://example.org/LLCP2015XPT.zip failed with HTTP 503"
        );
    }

    #[test]
    fn test_recoverability() {
        let corrupt = IngestError::Decode {
            path: PathBuf::from("LLCP2015.XPT"),
            source: XptError::TrailingBytes,
        };
        assert!(corrupt.is_recoverable());

        let unreadable = IngestError::Decode {
            path: PathBuf::from("LLCP2015.XPT"),
            source: XptError::Io(std::io::Error::other("disk")),
        };
        assert!(!unreadable.is_recoverable());

        let status = IngestError::HttpStatus {
            url: String::new(),
            status: 500,
        };
        assert!(!status.is_recoverable());
    }
}
