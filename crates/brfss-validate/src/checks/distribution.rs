//! Sample mean and standard deviation gates on a standardized column.

use polars::prelude::{ChunkAgg, ChunkVar, Float64Chunked, NewChunkedArray};

use super::{BMI_MEAN_RANGE, BMI_STD_RANGE};
use crate::issue::{Issue, Statistic};
use crate::report::ValidationReport;

pub(super) fn check(values: &[(usize, f64)], name: &str, report: &mut ValidationReport) {
    if values.is_empty() {
        return;
    }
    let sample =
        Float64Chunked::from_iter_values("sample".into(), values.iter().map(|(_, v)| *v));
    let mean = sample.mean().unwrap_or(f64::NAN);
    // Undefined for a single value, which then fails the range check.
    let std = sample
        .std(1)
        .filter(|_| values.len() > 1)
        .unwrap_or(f64::NAN);

    for (statistic, value, (low, high)) in [
        (Statistic::Mean, mean, BMI_MEAN_RANGE),
        (Statistic::StdDev, std, BMI_STD_RANGE),
    ] {
        if !(low..=high).contains(&value) {
            report.add(Issue::StatisticOutOfRange {
                column: name.to_string(),
                statistic,
                value,
                low,
                high,
            });
        }
    }
}
