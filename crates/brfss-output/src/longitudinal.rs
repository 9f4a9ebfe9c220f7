//! All persisted years as one table.

use std::path::Path;

use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::debug;

use crate::error::Result;
use crate::store::{OutputStore, read_parquet};

/// Name of the column carrying each row's survey year.
pub const YEAR_COLUMN: &str = "Year";

/// Read every output in `dir`, tag rows with their year and stack them in
/// year order. An empty or missing directory yields an empty table.
pub fn load_longitudinal(dir: &Path) -> Result<DataFrame> {
    let store = OutputStore::new(dir);
    let mut combined: Option<DataFrame> = None;

    for persisted in store.list()? {
        let mut frame = read_parquet(&persisted.path)?;
        let years = vec![persisted.year; frame.height()];
        frame.with_column(Series::new(YEAR_COLUMN.into(), years))?;
        debug!(year = persisted.year, rows = frame.height(), "loaded output");

        match combined.as_mut() {
            Some(all) => {
                all.vstack_mut(&frame)?;
            }
            None => combined = Some(frame),
        }
    }

    Ok(combined.unwrap_or_else(DataFrame::empty))
}
