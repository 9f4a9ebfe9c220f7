//! Value normalization of coded survey answers.
//!
//! Removes duplicates and incomplete responses, collapses the diabetes
//! question into a binary label, applies the per-feature sentinel and
//! replacement rules, rescales BMI and drops unknown age groups.

use std::collections::HashSet;

use brfss_model::{
    AGE_UNKNOWN, BMI_DIVISOR, Feature, FeatureKind, RECODE_RULES, TARGET_ACCEPTED, TARGET_POSITIVE,
};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use serde::Serialize;
use tracing::{debug, info_span};

use crate::error::{Result, TransformError};
use crate::frame::{cell_key, column_options, int_column};

/// Rows removed by each recoding step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecodeStats {
    pub input_rows: usize,
    pub duplicates: usize,
    pub incomplete: usize,
    pub target_excluded: usize,
    /// Rows carrying a sentinel code in any binary feature.
    pub sentinel: usize,
    /// Rows whose binary value was outside {0, 1} after replacement.
    pub out_of_domain: usize,
    pub age_unknown: usize,
    pub output_rows: usize,
}

enum RowFate {
    Keep,
    Duplicate,
    Incomplete,
    TargetExcluded,
    Sentinel,
    OutOfDomain,
    AgeUnknown,
}

/// Recode a freshly mapped canonical table.
///
/// Binary and ordinal columns come out as `Int64`, BMI as `Float64`. A table
/// left without rows is an error.
pub fn recode(table: &DataFrame) -> Result<(DataFrame, RecodeStats)> {
    let span = info_span!("recode", rows = table.height());
    let _guard = span.enter();

    let raw: Vec<Vec<Option<f64>>> = Feature::ALL
        .iter()
        .map(|feature| column_options(table, feature.name()))
        .collect::<Result<_>>()?;

    let mut stats = RecodeStats {
        input_rows: table.height(),
        ..RecodeStats::default()
    };
    let mut out: Vec<Vec<f64>> = vec![Vec::new(); Feature::ALL.len()];
    let mut seen: HashSet<Vec<u64>> = HashSet::new();

    for row in 0..table.height() {
        let cells: Vec<Option<f64>> = raw.iter().map(|column| column[row]).collect();
        let (fate, values) = recode_row(&cells, &mut seen);
        match fate {
            RowFate::Keep => {
                for (column, value) in out.iter_mut().zip(values) {
                    column.push(value);
                }
            }
            RowFate::Duplicate => stats.duplicates += 1,
            RowFate::Incomplete => stats.incomplete += 1,
            RowFate::TargetExcluded => stats.target_excluded += 1,
            RowFate::Sentinel => stats.sentinel += 1,
            RowFate::OutOfDomain => stats.out_of_domain += 1,
            RowFate::AgeUnknown => stats.age_unknown += 1,
        }
    }

    stats.output_rows = out[0].len();
    debug!(?stats, "recoded");
    if stats.output_rows == 0 {
        return Err(TransformError::EmptyTable { stage: "recode" });
    }

    let columns: Vec<Column> = Feature::ALL
        .iter()
        .zip(out)
        .map(|(feature, values)| match feature.kind() {
            FeatureKind::Continuous => Series::new(feature.name().into(), values).into(),
            _ => int_column(feature.name(), &values),
        })
        .collect();
    Ok((DataFrame::new(columns)?, stats))
}

/// Apply every step to one row, in order; the first failing step decides.
fn recode_row(cells: &[Option<f64>], seen: &mut HashSet<Vec<u64>>) -> (RowFate, Vec<f64>) {
    let key: Vec<u64> = cells.iter().map(|cell| cell_key(*cell)).collect();
    if !seen.insert(key) {
        return (RowFate::Duplicate, Vec::new());
    }

    let mut values = Vec::with_capacity(cells.len());
    for cell in cells {
        match cell {
            Some(v) if !v.is_nan() => values.push(*v),
            _ => return (RowFate::Incomplete, Vec::new()),
        }
    }

    let target = Feature::TARGET.position();
    match whole(values[target]) {
        Some(code) if TARGET_ACCEPTED.contains(&code) => {
            values[target] = if code == TARGET_POSITIVE { 1.0 } else { 0.0 };
        }
        _ => return (RowFate::TargetExcluded, Vec::new()),
    }

    for rule in &RECODE_RULES {
        let idx = rule.feature.position();
        let Some(code) = whole(values[idx]) else {
            return (RowFate::OutOfDomain, Vec::new());
        };
        if rule.drops(code) {
            return (RowFate::Sentinel, Vec::new());
        }
        let replaced = rule.apply(code);
        if replaced != 0 && replaced != 1 {
            return (RowFate::OutOfDomain, Vec::new());
        }
        values[idx] = replaced as f64;
    }

    let bmi = Feature::Bmi.position();
    values[bmi] /= BMI_DIVISOR;

    let age = Feature::Age.position();
    match whole(values[age]) {
        Some(code) if code == AGE_UNKNOWN => return (RowFate::AgeUnknown, Vec::new()),
        Some(code) if code >= 0 => values[age] = code as f64,
        _ => return (RowFate::OutOfDomain, Vec::new()),
    }

    (RowFate::Keep, values)
}

/// Integer code for a whole-number value.
fn whole(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value.abs() < 1e15).then_some(value as i64)
}
