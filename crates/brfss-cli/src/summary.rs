use std::path::{Path, PathBuf};
use std::time::Duration;

use brfss_cli::walk::WalkSummary;
use brfss_model::YearOutcome;
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

/// One persisted year as shown by `status`.
pub struct StatusRow {
    pub year: i32,
    pub rows: usize,
    pub path: PathBuf,
}

pub fn print_walk_summary(summary: &WalkSummary) {
    println!("Start year: {}", summary.start_year);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Year"),
        header_cell("Outcome"),
        header_cell("Rows"),
        header_cell("Time"),
        header_cell("Detail"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let mut total_rows = 0usize;
    for report in &summary.reports {
        total_rows += report.rows.unwrap_or(0);
        table.add_row(vec![
            Cell::new(report.year).add_attribute(Attribute::Bold),
            outcome_cell(report.outcome),
            count_cell(report.rows),
            dim_cell(format_elapsed(report.elapsed)),
            detail_cell(&report.detail),
        ]);
    }
    let persisted = summary.count(YearOutcome::Complete);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{persisted} persisted"))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");

    match summary.stopped_at {
        Some(year) => println!("Stopped at {year}: no release published."),
        None => println!(
            "Stopped at the year ceiling; the next run resumes after the last persisted year."
        ),
    }
}

pub fn print_status(dir: &Path, rows: &[StatusRow], next_year: i32) {
    println!("Output: {}", dir.display());
    if rows.is_empty() {
        println!("No persisted years.");
    } else {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Year"),
            header_cell("Rows"),
            header_cell("File"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 0, CellAlignment::Right);
        align_column(&mut table, 1, CellAlignment::Right);
        for row in rows {
            table.add_row(vec![
                Cell::new(row.year).add_attribute(Attribute::Bold),
                Cell::new(row.rows),
                dim_cell(
                    row.path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                ),
            ]);
        }
        println!("{table}");
    }
    println!("Next run starts at {next_year}.");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(19)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::UpperBoundary(Width::Percentage(60)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn outcome_cell(outcome: YearOutcome) -> Cell {
    let cell = Cell::new(outcome.as_str());
    match outcome {
        YearOutcome::Complete => cell.fg(Color::Green).add_attribute(Attribute::Bold),
        YearOutcome::ValidationFailed | YearOutcome::Failed => {
            cell.fg(Color::Red).add_attribute(Attribute::Bold)
        }
        YearOutcome::MissingFeatures | YearOutcome::PatternMismatch => cell.fg(Color::Yellow),
        YearOutcome::SourceAbsent | YearOutcome::CeilingReached => cell.fg(Color::DarkGrey),
    }
}

fn count_cell(count: Option<usize>) -> Cell {
    match count {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn detail_cell(detail: &str) -> Cell {
    if detail.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(detail)
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_switches_to_seconds() {
        assert_eq!(format_elapsed(Duration::from_millis(250)), "250ms");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.5s");
    }
}
