//! The fetch boundary between the year walk and wherever releases live.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use brfss_xpt::{XptReadOptions, read_xpt};
use polars::prelude::DataFrame;
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// One fetched release: the artifact name and its decoded table.
#[derive(Debug, Clone)]
pub struct RawSurvey {
    /// Artifact file name; the survey year is parsed from it.
    pub identity: String,
    /// Raw respondent table with the release's own variable names.
    pub table: DataFrame,
}

/// Yields one survey release per year.
///
/// `Ok(None)` means upstream has no release for `year`; the walk stops there.
pub trait YearSource {
    fn fetch(&self, year: i32) -> Result<Option<RawSurvey>>;
}

impl<F> YearSource for F
where
    F: Fn(i32) -> Result<Option<RawSurvey>>,
{
    fn fetch(&self, year: i32) -> Result<Option<RawSurvey>> {
        self(year)
    }
}

/// Releases already unpacked into a local directory.
///
/// A year is present when the directory holds a file whose trimmed name ends
/// in `.xpt` (any case) and mentions the year.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    raw_dir: PathBuf,
    options: XptReadOptions,
}

impl DirectorySource {
    pub fn new(raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            options: XptReadOptions::default(),
        }
    }

    /// Decode only these variables from each release.
    #[must_use]
    pub fn with_projection<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.options = XptReadOptions::default().with_columns(columns);
        self
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    /// Find the transport file for `year`, if one has been unpacked.
    pub fn locate(&self, year: i32) -> Result<Option<PathBuf>> {
        let entries = match fs::read_dir(&self.raw_dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(IngestError::DirectoryRead {
                    path: self.raw_dir.clone(),
                    source,
                });
            }
        };

        let year_text = year.to_string();
        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| IngestError::DirectoryRead {
                path: self.raw_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if is_transport_for_year(name, &year_text) {
                candidates.push(path);
            }
        }
        candidates.sort();
        Ok(candidates.into_iter().next())
    }

    /// Decode a transport file with this source's projection.
    pub fn read(&self, path: &Path) -> Result<RawSurvey> {
        let start = Instant::now();
        let frame = read_xpt(path, self.options.clone()).map_err(|source| IngestError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let identity = path
            .file_name()
            .map(|name| name.to_string_lossy().trim().to_string())
            .unwrap_or_default();
        info!(
            file = %identity,
            rows = frame.data.height(),
            columns = frame.data.width(),
            duration_ms = start.elapsed().as_millis(),
            "read survey release"
        );
        Ok(RawSurvey {
            identity,
            table: frame.data,
        })
    }
}

impl YearSource for DirectorySource {
    fn fetch(&self, year: i32) -> Result<Option<RawSurvey>> {
        match self.locate(year)? {
            Some(path) => self.read(&path).map(Some),
            None => {
                debug!(year, dir = %self.raw_dir.display(), "no local release");
                Ok(None)
            }
        }
    }
}

pub(crate) fn is_transport_for_year(name: &str, year: &str) -> bool {
    let trimmed = name.trim();
    trimmed.to_ascii_lowercase().ends_with(".xpt") && trimmed.contains(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_name_matching() {
        assert!(is_transport_for_year("LLCP2015.XPT ", "2015"));
        assert!(is_transport_for_year("llcp2015.xpt", "2015"));
        assert!(!is_transport_for_year("LLCP2015XPT.zip", "2015"));
        assert!(!is_transport_for_year("LLCP2016.XPT", "2015"));
    }

    #[test]
    fn missing_directory_means_absent() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("nope"));
        assert!(source.locate(2015).unwrap().is_none());
    }
}
