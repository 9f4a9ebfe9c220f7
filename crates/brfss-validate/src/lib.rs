//! Schema validation of processed diabetes indicator tables.
//!
//! A table passes when [`validate`] returns an empty report.

pub mod checks;
pub mod issue;
pub mod report;

pub use checks::{BMI_MEAN_RANGE, BMI_STD_RANGE, BMI_VALUE_RANGE};
pub use issue::{FailureCase, Issue, MAX_FAILURE_CASES, Statistic};
pub use report::ValidationReport;

use polars::prelude::DataFrame;

/// Check every canonical column of `table`.
pub fn validate(table: &DataFrame) -> ValidationReport {
    checks::run_all(table)
}
