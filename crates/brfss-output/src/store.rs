//! Directory of persisted per-year tables.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use brfss_model::Feature;
use polars::prelude::{DataFrame, ParquetReader, ParquetWriter, SerReader};
use tracing::{info, warn};

use crate::error::{OutputError, Result};
use crate::naming::{is_output_file, output_file_name, parse_output_year};

/// One persisted year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedYear {
    pub year: i32,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, year: i32) -> PathBuf {
        self.dir.join(output_file_name(year))
    }

    /// Parquet files whose names carry a year, sorted by year.
    ///
    /// A missing directory holds nothing. Parquet files without a parseable
    /// year are skipped with a warning.
    pub fn list(&self) -> Result<Vec<PersistedYear>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir).map_err(|e| OutputError::Io {
            operation: "read directory",
            path: self.dir.clone(),
            source: e,
        })?;

        let mut years = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| OutputError::Io {
                    operation: "read directory",
                    path: self.dir.clone(),
                    source: e,
                })?
                .path();
            if !path.is_file() || !is_output_file(&path) {
                continue;
            }
            match parse_output_year(&path) {
                Some(year) => years.push(PersistedYear { year, path }),
                None => warn!(path = %path.display(), "skipping output without a year in its name"),
            }
        }
        years.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.path.cmp(&b.path)));
        Ok(years)
    }

    /// Highest persisted year, if any.
    pub fn latest_year(&self) -> Result<Option<i32>> {
        Ok(self.list()?.last().map(|persisted| persisted.year))
    }

    /// Year the next walk should start from.
    pub fn resume_year(&self, default_start: i32) -> Result<i32> {
        Ok(self
            .latest_year()?
            .map_or(default_start, |latest| latest + 1))
    }

    /// Persist the canonical columns of `table` for `year`.
    ///
    /// Writes to a temporary sibling and renames it into place, so the
    /// target is either absent or complete.
    pub fn write(&self, year: i32, table: &DataFrame) -> Result<PathBuf> {
        let mut canonical = canonical_columns(year, table)?;

        fs::create_dir_all(&self.dir).map_err(|e| OutputError::Io {
            operation: "create directory",
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.path_for(year);
        let temp_path = path.with_extension("parquet.tmp");
        let file = File::create(&temp_path).map_err(|e| OutputError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        if let Err(err) = ParquetWriter::new(file).finish(&mut canonical) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }

        fs::rename(&temp_path, &path).map_err(|e| OutputError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.clone(),
            source: e,
        })?;

        info!(year, rows = canonical.height(), path = %path.display(), "output written");
        Ok(path)
    }

    pub fn read(&self, year: i32) -> Result<DataFrame> {
        read_parquet(&self.path_for(year))
    }
}

pub(crate) fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|e| OutputError::Io {
        operation: "open",
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(ParquetReader::new(file).finish()?)
}

/// Exactly the canonical columns, in canonical order.
fn canonical_columns(year: i32, table: &DataFrame) -> Result<DataFrame> {
    for name in Feature::column_names() {
        if table.column(name).is_err() {
            return Err(OutputError::MissingColumn {
                year,
                column: name.to_string(),
            });
        }
    }
    Ok(table.select(Feature::column_names())?)
}
