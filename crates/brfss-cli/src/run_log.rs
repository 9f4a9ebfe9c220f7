//! Append-only run and validation logs.
//!
//! `run.log` gets one tab-separated line per attempted year:
//! `timestamp  year  outcome  detail`. `validation_summary.log` gets the
//! failure-case block of every year rejected by validation. Neither file is
//! ever truncated.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brfss_model::YearOutcome;
use brfss_validate::ValidationReport;
use chrono::{SecondsFormat, Utc};

pub const RUN_LOG_FILE: &str = "run.log";
pub const VALIDATION_LOG_FILE: &str = "validation_summary.log";

/// Owner of both log files for the duration of a run.
pub struct RunLog {
    dir: PathBuf,
    run: File,
    validation: File,
}

impl RunLog {
    /// Open (creating if needed) both logs in `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("create log directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            run: open_append(&dir.join(RUN_LOG_FILE))?,
            validation: open_append(&dir.join(VALIDATION_LOG_FILE))?,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append the outcome line for `year`.
    pub fn record(&mut self, year: i32, outcome: YearOutcome, detail: &str) -> io::Result<()> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let line = format_run_line(&timestamp, year, outcome, detail);
        self.run.write_all(line.as_bytes())?;
        self.run.flush()
    }

    /// Append the failure cases of a rejected year.
    pub fn record_validation_failure(
        &mut self,
        year: i32,
        path: &Path,
        report: &ValidationReport,
    ) -> io::Result<()> {
        let block = report.render_failure_block(year, &path.display().to_string());
        self.validation.write_all(block.as_bytes())?;
        self.validation.flush()
    }
}

/// One `run.log` line, newline-terminated. Tabs and newlines in `detail` are
/// flattened to spaces.
pub fn format_run_line(timestamp: &str, year: i32, outcome: YearOutcome, detail: &str) -> String {
    let detail: String = detail
        .chars()
        .map(|c| if c == '\t' || c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!("{timestamp}\t{year}\t{outcome}\t{}\n", detail.trim())
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_line_layout() {
        let line = format_run_line(
            "2024-05-01T10:00:00Z",
            2016,
            YearOutcome::MissingFeatures,
            "missing: Smoker",
        );
        insta::assert_snapshot!(line.trim_end(), @"2024-05-01T10:00:00Z\t2016\tmissing-features\tmissing: Smoker");
    }

    #[test]
    fn detail_is_kept_on_one_line() {
        let line = format_run_line("t", 2020, YearOutcome::Failed, "first\nsecond\tthird");
        assert_eq!(line, "t\t2020\tfailed\tfirst second third\n");
    }

    #[test]
    fn reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut log = RunLog::open(dir.path()).unwrap();
            log.record(2015, YearOutcome::Complete, "").unwrap();
        }
        {
            let mut log = RunLog::open(dir.path()).unwrap();
            log.record(2016, YearOutcome::SourceAbsent, "").unwrap();
        }
        let text = fs::read_to_string(dir.path().join(RUN_LOG_FILE)).unwrap();
        let years: Vec<&str> = text
            .lines()
            .map(|line| line.split('\t').nth(1).unwrap())
            .collect();
        assert_eq!(years, vec!["2015", "2016"]);
        assert!(dir.path().join(VALIDATION_LOG_FILE).exists());
    }
}
