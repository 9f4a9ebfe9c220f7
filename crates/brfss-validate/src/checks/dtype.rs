//! Storage type checks.

use polars::prelude::Column;

use super::ColumnRule;
use crate::issue::Issue;
use crate::report::ValidationReport;

/// Returns `true` when the column has the expected storage type.
pub(super) fn check(
    column: &Column,
    name: &str,
    rule: ColumnRule,
    report: &mut ValidationReport,
) -> bool {
    if rule.accepts(column.dtype()) {
        return true;
    }
    report.add(Issue::WrongType {
        column: name.to_string(),
        expected: rule.expected_type(),
        found: column.dtype().to_string(),
    });
    false
}
