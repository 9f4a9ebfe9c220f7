//! Interquartile-range clipping of continuous columns.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::frame::{column_values, replace_f64};
use crate::stats::quantile;

/// Tukey fence multiplier.
pub const IQR_FACTOR: f64 = 1.5;

/// Closed clipping interval for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
}

impl Bounds {
    /// Tukey fences `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]` of a sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let q1 = quantile(values, 0.25)?;
        let q3 = quantile(values, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            low: q1 - IQR_FACTOR * iqr,
            high: q3 + IQR_FACTOR * iqr,
        })
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.low, self.high)
    }
}

/// Fences for each named column, computed on the table as given.
pub fn iqr_bounds(table: &DataFrame, columns: &[&str]) -> Result<BTreeMap<String, Bounds>> {
    let mut bounds = BTreeMap::new();
    for column in columns {
        let values = column_values(table, column)?;
        let fences = Bounds::from_values(&values).ok_or(TransformError::EmptyTable {
            stage: "outlier clipping",
        })?;
        bounds.insert((*column).to_string(), fences);
    }
    Ok(bounds)
}

/// Replace values outside each column's bounds with the nearest bound.
///
/// Row count is unchanged. Returns the clipped table and the number of
/// values that moved per column.
pub fn clip(
    table: &DataFrame,
    bounds: &BTreeMap<String, Bounds>,
) -> Result<(DataFrame, BTreeMap<String, usize>)> {
    let mut clipped = table.clone();
    let mut moved = BTreeMap::new();
    for (column, fences) in bounds {
        let values = column_values(table, column)?;
        let mut count = 0usize;
        let values: Vec<f64> = values
            .into_iter()
            .map(|value| {
                let clamped = fences.clamp(value);
                if clamped != value {
                    count += 1;
                }
                clamped
            })
            .collect();
        debug!(column = %column, low = fences.low, high = fences.high, clipped = count, "clipped");
        replace_f64(&mut clipped, column, values)?;
        moved.insert(column.clone(), count);
    }
    Ok((clipped, moved))
}

/// Compute fences and clip in one step.
pub fn clip_iqr(
    table: &DataFrame,
    columns: &[&str],
) -> Result<(DataFrame, BTreeMap<String, usize>)> {
    let bounds = iqr_bounds(table, columns)?;
    clip(table, &bounds)
}
