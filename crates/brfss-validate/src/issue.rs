//! Validation issue types.
//!
//! Each variant carries only the data its check produced, including the
//! failing rows (capped at [`MAX_FAILURE_CASES`]) or the offending statistic.

use serde::Serialize;

/// Failing rows kept per issue; the total is always reported.
pub const MAX_FAILURE_CASES: usize = 50;

/// One failing cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FailureCase {
    pub row: usize,
    pub value: f64,
}

/// Summary statistic checked against a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Statistic {
    Mean,
    /// Sample standard deviation (n - 1).
    StdDev,
}

impl Statistic {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::StdDev => "std",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Issue {
    // Presence
    ColumnMissing {
        column: String,
    },
    NullValues {
        column: String,
        null_count: usize,
        rows: Vec<usize>,
    },

    // Type
    WrongType {
        column: String,
        expected: &'static str,
        found: String,
    },

    // Value
    /// Value outside a closed set of integer codes.
    NotInSet {
        column: String,
        allowed: Vec<i64>,
        invalid_count: usize,
        cases: Vec<FailureCase>,
    },
    BelowMinimum {
        column: String,
        minimum: f64,
        invalid_count: usize,
        cases: Vec<FailureCase>,
    },
    OutOfRange {
        column: String,
        low: f64,
        high: f64,
        invalid_count: usize,
        cases: Vec<FailureCase>,
    },

    // Distribution
    StatisticOutOfRange {
        column: String,
        statistic: Statistic,
        value: f64,
        low: f64,
        high: f64,
    },
}

impl Issue {
    pub fn column(&self) -> &str {
        match self {
            Issue::ColumnMissing { column }
            | Issue::NullValues { column, .. }
            | Issue::WrongType { column, .. }
            | Issue::NotInSet { column, .. }
            | Issue::BelowMinimum { column, .. }
            | Issue::OutOfRange { column, .. }
            | Issue::StatisticOutOfRange { column, .. } => column,
        }
    }

    /// Short name of the failed check.
    pub fn check(&self) -> String {
        match self {
            Issue::ColumnMissing { .. } => "column_present".to_string(),
            Issue::NullValues { .. } => "not_nullable".to_string(),
            Issue::WrongType { expected, .. } => format!("dtype('{expected}')"),
            Issue::NotInSet { allowed, .. } => {
                let allowed: Vec<String> = allowed.iter().map(i64::to_string).collect();
                format!("isin([{}])", allowed.join(", "))
            }
            Issue::BelowMinimum { minimum, .. } => format!("greater_than_or_equal_to({minimum})"),
            Issue::OutOfRange { low, high, .. } => format!("in_range({low}, {high})"),
            Issue::StatisticOutOfRange {
                statistic,
                low,
                high,
                ..
            } => format!("{} in [{low}, {high}]", statistic.label()),
        }
    }

    /// Number of failing rows, or `None` for column-level issues.
    pub fn count(&self) -> Option<usize> {
        match self {
            Issue::ColumnMissing { .. }
            | Issue::WrongType { .. }
            | Issue::StatisticOutOfRange { .. } => None,
            Issue::NullValues { null_count, .. } => Some(*null_count),
            Issue::NotInSet { invalid_count, .. }
            | Issue::BelowMinimum { invalid_count, .. }
            | Issue::OutOfRange { invalid_count, .. } => Some(*invalid_count),
        }
    }

    /// `(row, failure value)` pairs; row is `None` for column-level issues.
    pub fn failure_cases(&self) -> Vec<(Option<usize>, String)> {
        match self {
            Issue::ColumnMissing { column } => vec![(None, column.clone())],
            Issue::NullValues { rows, .. } => {
                rows.iter().map(|row| (Some(*row), "null".to_string())).collect()
            }
            Issue::WrongType { found, .. } => vec![(None, found.clone())],
            Issue::NotInSet { cases, .. }
            | Issue::BelowMinimum { cases, .. }
            | Issue::OutOfRange { cases, .. } => cases
                .iter()
                .map(|case| (Some(case.row), format_value(case.value)))
                .collect(),
            Issue::StatisticOutOfRange { value, .. } => vec![(None, format_value(*value))],
        }
    }

    pub fn message(&self) -> String {
        match self {
            Issue::ColumnMissing { column } => format!("column {column} is missing"),
            Issue::NullValues {
                column, null_count, ..
            } => format!("column {column} has {null_count} missing values"),
            Issue::WrongType {
                column,
                expected,
                found,
            } => format!("column {column} should be {expected}, found {found}"),
            Issue::StatisticOutOfRange {
                column,
                statistic,
                value,
                low,
                high,
            } => format!(
                "{} of {column} is {}, expected within [{low}, {high}]",
                statistic.label(),
                format_value(*value)
            ),
            other => format!(
                "column {} failed {} for {} rows",
                other.column(),
                other.check(),
                other.count().unwrap_or_default()
            ),
        }
    }
}

/// Integral values print without a fractional part.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.6}")
    }
}
