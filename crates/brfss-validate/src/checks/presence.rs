//! Column presence and completeness.

use polars::prelude::{Column, DataFrame};

use crate::issue::{Issue, MAX_FAILURE_CASES};
use crate::report::ValidationReport;

pub(super) fn check_present<'a>(
    df: &'a DataFrame,
    name: &str,
    report: &mut ValidationReport,
) -> Option<&'a Column> {
    let column = df.column(name).ok();
    if column.is_none() {
        report.add(Issue::ColumnMissing {
            column: name.to_string(),
        });
    }
    column
}

pub(super) fn check_nulls(column: &Column, name: &str, report: &mut ValidationReport) {
    let null_count = column.null_count();
    if null_count == 0 {
        return;
    }
    let rows = column
        .is_null()
        .into_iter()
        .enumerate()
        .filter(|(_, is_null)| *is_null == Some(true))
        .map(|(row, _)| row)
        .take(MAX_FAILURE_CASES)
        .collect();
    report.add(Issue::NullValues {
        column: name.to_string(),
        null_count,
        rows,
    });
}
