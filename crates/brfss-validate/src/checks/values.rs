//! Per-value domain checks.

use super::collect_failures;
use crate::issue::Issue;
use crate::report::ValidationReport;

pub(super) fn check_binary(values: &[(usize, f64)], name: &str, report: &mut ValidationReport) {
    let (invalid_count, cases) = collect_failures(values, |v| v != 0.0 && v != 1.0);
    if invalid_count > 0 {
        report.add(Issue::NotInSet {
            column: name.to_string(),
            allowed: vec![0, 1],
            invalid_count,
            cases,
        });
    }
}

pub(super) fn check_non_negative(
    values: &[(usize, f64)],
    name: &str,
    report: &mut ValidationReport,
) {
    let (invalid_count, cases) = collect_failures(values, |v| v < 0.0);
    if invalid_count > 0 {
        report.add(Issue::BelowMinimum {
            column: name.to_string(),
            minimum: 0.0,
            invalid_count,
            cases,
        });
    }
}

pub(super) fn check_range(
    values: &[(usize, f64)],
    name: &str,
    (low, high): (f64, f64),
    report: &mut ValidationReport,
) {
    let (invalid_count, cases) = collect_failures(values, |v| !(low..=high).contains(&v));
    if invalid_count > 0 {
        report.add(Issue::OutOfRange {
            column: name.to_string(),
            low,
            high,
            invalid_count,
            cases,
        });
    }
}
