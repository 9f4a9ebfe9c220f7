//! Year-walk controller.
//!
//! Starting at the resume year, fetches one release per year and runs it
//! through [`process_year`] until the source reports a year as absent. Every
//! attempted year gets exactly one line in the run log. Hitting the year
//! ceiling is logged as its own line for the first year not attempted. Only
//! fatal errors (configuration, file system, network) stop the walk early.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use brfss_ingest::{YearSource, parse_survey_year};
use brfss_model::YearOutcome;
use brfss_output::OutputStore;
use tracing::{error, info, info_span, warn};

use crate::pipeline::{PipelineConfig, YearResult, process_year};
use crate::run_log::RunLog;

/// What happened to one attempted year.
#[derive(Debug, Clone)]
pub struct YearReport {
    pub year: i32,
    pub outcome: YearOutcome,
    pub detail: String,
    pub rows: Option<usize>,
    pub path: Option<PathBuf>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct WalkSummary {
    pub start_year: i32,
    pub reports: Vec<YearReport>,
    /// Year the source reported absent; `None` if the ceiling was reached,
    /// in which case the last report is [`YearOutcome::CeilingReached`].
    pub stopped_at: Option<i32>,
}

impl WalkSummary {
    pub fn count(&self, outcome: YearOutcome) -> usize {
        self.reports
            .iter()
            .filter(|report| report.outcome == outcome)
            .count()
    }

    pub fn persisted_years(&self) -> Vec<i32> {
        self.reports
            .iter()
            .filter(|report| report.outcome.is_success())
            .map(|report| report.year)
            .collect()
    }
}

pub struct YearWalker<'a> {
    source: &'a dyn YearSource,
    config: &'a PipelineConfig,
    store: &'a OutputStore,
    run_log: &'a mut RunLog,
    max_years: u32,
}

impl<'a> YearWalker<'a> {
    pub fn new(
        source: &'a dyn YearSource,
        config: &'a PipelineConfig,
        store: &'a OutputStore,
        run_log: &'a mut RunLog,
    ) -> Self {
        Self {
            source,
            config,
            store,
            run_log,
            max_years: 100,
        }
    }

    #[must_use]
    pub fn with_max_years(mut self, max_years: u32) -> Self {
        self.max_years = max_years;
        self
    }

    /// Walk forward from `start_year` until a year is absent.
    pub fn walk(&mut self, start_year: i32) -> Result<WalkSummary> {
        let mut summary = WalkSummary {
            start_year,
            ..WalkSummary::default()
        };

        for offset in 0..self.max_years {
            let year = start_year + offset as i32;
            let span = info_span!("year", year);
            let _guard = span.enter();
            let start = Instant::now();

            let report = match self.attempt(year)? {
                Attempt::Absent => {
                    let report = self.finish(year, YearOutcome::SourceAbsent, String::new(), start)?;
                    summary.reports.push(report);
                    summary.stopped_at = Some(year);
                    info!(year, "no release published, stopping");
                    return Ok(summary);
                }
                Attempt::Done {
                    outcome,
                    detail,
                    rows,
                    path,
                } => {
                    let mut report = self.finish(year, outcome, detail, start)?;
                    report.rows = rows;
                    report.path = path;
                    report
                }
            };
            summary.reports.push(report);
        }

        let next = start_year + self.max_years as i32;
        warn!(
            start_year,
            max_years = self.max_years,
            next_year = next,
            "year ceiling reached before an absent year"
        );
        let detail = format!("max_years {} reached; {next} not attempted", self.max_years);
        let report = self.finish(next, YearOutcome::CeilingReached, detail, Instant::now())?;
        summary.reports.push(report);
        Ok(summary)
    }

    fn attempt(&mut self, year: i32) -> Result<Attempt> {
        let survey = match self.source.fetch(year) {
            Ok(Some(survey)) => survey,
            Ok(None) => return Ok(Attempt::Absent),
            Err(err) if err.is_recoverable() => {
                warn!(year, error = %err, "release could not be read");
                return Ok(Attempt::failed(err.to_string()));
            }
            Err(err) => return Err(err).with_context(|| format!("fetch release for {year}")),
        };

        if parse_survey_year(&survey.identity) != Some(year) {
            warn!(year, identity = %survey.identity, "artifact name does not carry the year");
            return Ok(Attempt::Done {
                outcome: YearOutcome::PatternMismatch,
                detail: format!("artifact '{}' does not match LLCP{year}", survey.identity),
                rows: None,
                path: None,
            });
        }

        match process_year(year, &survey.table, self.config, self.store) {
            Ok(YearResult::Persisted { path, rows, .. }) => Ok(Attempt::Done {
                outcome: YearOutcome::Complete,
                detail: format!("{rows} rows"),
                rows: Some(rows),
                path: Some(path),
            }),
            Ok(YearResult::MissingFeatures { missing }) => {
                warn!(year, missing = ?missing, "features missing, year skipped");
                Ok(Attempt::Done {
                    outcome: YearOutcome::MissingFeatures,
                    detail: format!("missing: {}", missing.join(", ")),
                    rows: None,
                    path: None,
                })
            }
            Ok(YearResult::ValidationFailed { path, report }) => {
                warn!(year, issues = report.len(), "validation failed, year skipped");
                self.run_log
                    .record_validation_failure(year, &path, &report)
                    .context("write validation log")?;
                Ok(Attempt::Done {
                    outcome: YearOutcome::ValidationFailed,
                    detail: report.summary(),
                    rows: None,
                    path: None,
                })
            }
            Err(err) if err.is_recoverable() => {
                warn!(year, error = %err, "year failed");
                Ok(Attempt::failed(err.to_string()))
            }
            Err(err) => {
                error!(year, error = %err, "fatal error");
                Err(err).with_context(|| format!("process {year}"))
            }
        }
    }

    fn finish(
        &mut self,
        year: i32,
        outcome: YearOutcome,
        detail: String,
        start: Instant,
    ) -> Result<YearReport> {
        self.run_log
            .record(year, outcome, &detail)
            .context("write run log")?;
        info!(year, %outcome, detail = %detail, "year finished");
        Ok(YearReport {
            year,
            outcome,
            detail,
            rows: None,
            path: None,
            elapsed: start.elapsed(),
        })
    }
}

enum Attempt {
    Absent,
    Done {
        outcome: YearOutcome,
        detail: String,
        rows: Option<usize>,
        path: Option<PathBuf>,
    },
}

impl Attempt {
    fn failed(detail: String) -> Self {
        Self::Done {
            outcome: YearOutcome::Failed,
            detail,
            rows: None,
            path: None,
        }
    }
}
