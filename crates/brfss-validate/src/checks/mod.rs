//! Validation check modules.
//!
//! Each module performs one kind of check over the canonical columns.

mod distribution;
mod dtype;
mod presence;
mod values;

use brfss_model::{Feature, FeatureKind};
use polars::prelude::{Column, DataFrame, DataType};
use tracing::debug;

use crate::issue::{FailureCase, MAX_FAILURE_CASES};
use crate::report::ValidationReport;

/// Allowed range of the BMI sample mean.
pub const BMI_MEAN_RANGE: (f64, f64) = (-0.1, 0.1);
/// Allowed range of the BMI sample standard deviation.
pub const BMI_STD_RANGE: (f64, f64) = (0.9, 1.1);
/// Allowed range of every BMI value.
pub const BMI_VALUE_RANGE: (f64, f64) = (-5.0, 5.0);

/// Expected storage and value rule of a canonical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnRule {
    /// Integer codes in {0, 1}.
    Binary,
    /// Integer codes >= 0.
    NonNegativeInt,
    /// Standardized float.
    Standardized,
}

impl ColumnRule {
    pub(crate) fn for_feature(feature: Feature) -> Self {
        match feature.kind() {
            FeatureKind::Target | FeatureKind::Binary => Self::Binary,
            FeatureKind::Ordinal => Self::NonNegativeInt,
            FeatureKind::Continuous => Self::Standardized,
        }
    }

    pub(crate) fn expected_type(&self) -> &'static str {
        match self {
            Self::Binary | Self::NonNegativeInt => "int64",
            Self::Standardized => "float64",
        }
    }

    pub(crate) fn accepts(&self, dtype: &DataType) -> bool {
        match self {
            Self::Binary | Self::NonNegativeInt => dtype.is_integer(),
            Self::Standardized => dtype.is_float(),
        }
    }
}

/// Run all validation checks on a processed table.
pub fn run_all(df: &DataFrame) -> ValidationReport {
    let mut report = ValidationReport::new();

    for feature in Feature::ALL {
        let name = feature.name();
        let rule = ColumnRule::for_feature(feature);

        // 1. Presence
        let Some(column) = presence::check_present(df, name, &mut report) else {
            continue;
        };

        // 2. Completeness
        presence::check_nulls(column, name, &mut report);

        // 3. Storage type; value checks only make sense on the right type
        if !dtype::check(column, name, rule, &mut report) {
            continue;
        }

        // 4. Values
        let values = cell_values(column);
        match rule {
            ColumnRule::Binary => values::check_binary(&values, name, &mut report),
            ColumnRule::NonNegativeInt => values::check_non_negative(&values, name, &mut report),
            ColumnRule::Standardized => {
                values::check_range(&values, name, BMI_VALUE_RANGE, &mut report);
                // 5. Distribution
                distribution::check(&values, name, &mut report);
            }
        }
    }

    debug!(issues = report.len(), "validation finished");
    report
}

/// Non-null cells with their row index.
fn cell_values(column: &Column) -> Vec<(usize, f64)> {
    let Ok(cast) = column.cast(&DataType::Float64) else {
        return Vec::new();
    };
    let Ok(values) = cast.f64() else {
        return Vec::new();
    };
    values
        .into_iter()
        .enumerate()
        .filter_map(|(row, value)| value.map(|value| (row, value)))
        .collect()
}

/// Failing cells, capped, plus the total failure count.
fn collect_failures(
    values: &[(usize, f64)],
    fails: impl Fn(f64) -> bool,
) -> (usize, Vec<FailureCase>) {
    let mut total = 0usize;
    let mut cases = Vec::new();
    for (row, value) in values {
        if fails(*value) {
            total += 1;
            if cases.len() < MAX_FAILURE_CASES {
                cases.push(FailureCase {
                    row: *row,
                    value: *value,
                });
            }
        }
    }
    (total, cases)
}
