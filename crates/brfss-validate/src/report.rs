//! Validation report and its text rendering.

use std::fmt::Write;

use serde::Serialize;

use crate::issue::Issue;

/// Every issue found in one table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    /// A table passes when no issue was found.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Distinct columns with at least one issue, in first-seen order.
    pub fn failed_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for issue in &self.issues {
            if !columns.contains(&issue.column()) {
                columns.push(issue.column());
            }
        }
        columns
    }

    /// One-line summary for the run log.
    pub fn summary(&self) -> String {
        format!(
            "{} issue(s) in {}",
            self.len(),
            self.failed_columns().join(", ")
        )
    }

    /// Failure-case block appended to the validation log.
    ///
    /// ```text
    /// [FAILED] BRFSS2015 - out/diabetes_01_health_indicators_BRFSS2015.parquet:
    /// column  check         failure_case  index
    /// HighBP  isin([0, 1])  2             4
    /// ```
    pub fn render_failure_block(&self, year: i32, path: &str) -> String {
        let header = ["column", "check", "failure_case", "index"].map(String::from);
        let mut rows: Vec<[String; 4]> = vec![header];
        for issue in &self.issues {
            for (row, value) in issue.failure_cases() {
                rows.push([
                    issue.column().to_string(),
                    issue.check(),
                    value,
                    row.map_or_else(|| "-".to_string(), |row| row.to_string()),
                ]);
            }
        }

        let mut widths = [0usize; 4];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let mut out = format!("[FAILED] BRFSS{year} - {path}:\n");
        for row in &rows {
            let mut line = String::new();
            for (idx, (cell, width)) in row.iter().zip(widths).enumerate() {
                if idx + 1 == row.len() {
                    line.push_str(cell);
                } else {
                    let _ = write!(line, "{cell:<width$}  ");
                }
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out.push('\n');
        out
    }
}
