use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Result of attempting one survey year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum YearOutcome {
    /// Year validated and persisted.
    Complete,
    /// At least one canonical feature had no matching source column.
    MissingFeatures,
    /// Final table failed schema validation; nothing persisted.
    ValidationFailed,
    /// Upstream reported no release for the year; the walk stops here.
    SourceAbsent,
    /// Fetched artifact's name did not carry a parseable year.
    PatternMismatch,
    /// A per-year data error (empty table, unfittable transform, bad file).
    Failed,
    /// The run hit its year ceiling; the year was not attempted.
    CeilingReached,
}

impl YearOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::MissingFeatures => "missing-features",
            Self::ValidationFailed => "validation-failed",
            Self::SourceAbsent => "source-absent",
            Self::PatternMismatch => "pattern-mismatch",
            Self::Failed => "failed",
            Self::CeilingReached => "ceiling-reached",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for YearOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YearOutcome {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "complete" => Ok(Self::Complete),
            "missing-features" => Ok(Self::MissingFeatures),
            "validation-failed" => Ok(Self::ValidationFailed),
            "source-absent" => Ok(Self::SourceAbsent),
            "pattern-mismatch" => Ok(Self::PatternMismatch),
            "failed" => Ok(Self::Failed),
            "ceiling-reached" => Ok(Self::CeilingReached),
            other => Err(ModelError::UnknownOutcome {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_text_matches_serde() {
        for outcome in [
            YearOutcome::Complete,
            YearOutcome::MissingFeatures,
            YearOutcome::ValidationFailed,
            YearOutcome::SourceAbsent,
            YearOutcome::PatternMismatch,
            YearOutcome::Failed,
            YearOutcome::CeilingReached,
        ] {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{}\"", outcome.as_str()));
            assert_eq!(outcome.as_str().parse::<YearOutcome>().unwrap(), outcome);
        }
    }

    #[test]
    fn unknown_outcome_is_an_error() {
        assert!("skipped".parse::<YearOutcome>().is_err());
    }
}
