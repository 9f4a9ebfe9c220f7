//! One survey year from raw table to persisted output.

use std::path::PathBuf;
use std::time::Instant;

use brfss_map::{ColumnMatch, MapError, MappedTable, map_columns};
use brfss_model::{Feature, FeatureMap};
use brfss_output::{OutputError, OutputStore};
use brfss_transform::{
    CorrectionRecord, PowerMethod, RecodeStats, ScaleMethod, ScaleParams, TransformError,
    binary_targets, clip_iqr, correct, drop_duplicate_rows, recode, scale, undersample,
};
use brfss_validate::{ValidationReport, validate};
use polars::prelude::DataFrame;
use thiserror::Error;
use tracing::{debug, info, info_span};

use crate::config::{Config, Result as ConfigResult};

/// Settings shared by every year of a run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub feature_map: FeatureMap,
    pub majority_cap: usize,
    pub seed: u64,
    pub power_method: PowerMethod,
    pub skew_threshold: f64,
    pub scale_method: ScaleMethod,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        Ok(Self {
            feature_map: config.feature_map()?,
            majority_cap: config.transform.majority_cap,
            seed: config.transform.seed,
            power_method: config.transform.power_method,
            skew_threshold: config.transform.skew_threshold,
            scale_method: config.transform.scale_method,
        })
    }
}

/// Failure while processing a year that made it past the fetch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("mapping failed: {0}")]
    Map(#[from] MapError),

    #[error("{0}")]
    Transform(#[from] TransformError),

    #[error("{0}")]
    Output(#[from] OutputError),
}

impl PipelineError {
    /// Data problems fail one year; storage problems end the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Map(_) | Self::Transform(_) => true,
            Self::Output(OutputError::MissingColumn { .. }) => true,
            Self::Output(_) => false,
        }
    }
}

/// What the stages did to an accepted year.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub matches: Vec<ColumnMatch>,
    pub recode: RecodeStats,
    pub balanced_rows: usize,
    pub clipped: usize,
    pub corrections: Vec<CorrectionRecord>,
    pub scaling: Vec<ScaleParams>,
    pub final_duplicates: usize,
}

#[derive(Debug)]
pub enum YearResult {
    Persisted {
        path: PathBuf,
        rows: usize,
        stages: Box<StageReport>,
    },
    MissingFeatures {
        missing: Vec<&'static str>,
    },
    ValidationFailed {
        /// Where the output would have been written.
        path: PathBuf,
        report: ValidationReport,
    },
}

/// Run every stage on one year's raw table and persist it if valid.
pub fn process_year(
    year: i32,
    raw: &DataFrame,
    config: &PipelineConfig,
    store: &OutputStore,
) -> Result<YearResult, PipelineError> {
    let year_span = info_span!("process_year", year, rows = raw.height());
    let _year_guard = year_span.enter();
    let start = Instant::now();

    // =========================================================================
    // Stage 1: Map source variables onto canonical features
    // =========================================================================
    let MappedTable {
        table,
        missing,
        matches,
    } = info_span!("map").in_scope(|| map_columns(raw, &config.feature_map))?;
    let Some(table) = table else {
        return Ok(YearResult::MissingFeatures {
            missing: missing.iter().map(Feature::name).collect(),
        });
    };

    // =========================================================================
    // Stage 2: Recode answers
    // =========================================================================
    let (table, recode_stats) = info_span!("recode").in_scope(|| recode(&table))?;

    // =========================================================================
    // Stage 3: Balance classes
    // =========================================================================
    let label = Feature::TARGET.name();
    let table = info_span!("balance").in_scope(|| -> Result<DataFrame, TransformError> {
        let targets = binary_targets(&table, label, config.majority_cap)?;
        undersample(&table, label, &targets, config.seed)
    })?;
    let balanced_rows = table.height();

    // =========================================================================
    // Stage 4-6: Continuous features (clip, correct, scale)
    // =========================================================================
    let continuous: Vec<&str> = Feature::continuous().map(|f| f.name()).collect();
    let (table, clipped) = info_span!("clip").in_scope(|| clip_iqr(&table, &continuous))?;
    let (table, corrections) = info_span!("correct").in_scope(|| {
        correct(
            &table,
            &continuous,
            config.power_method,
            config.skew_threshold,
        )
    })?;
    let (table, scaling) =
        info_span!("scale").in_scope(|| scale(&table, &continuous, config.scale_method))?;

    // =========================================================================
    // Stage 7: Drop rows that scaling made identical
    // =========================================================================
    let (table, final_duplicates) = drop_duplicate_rows(&table)?;
    debug!(removed = final_duplicates, "final deduplication");

    // =========================================================================
    // Stage 8: Validate
    // =========================================================================
    let report = info_span!("validate").in_scope(|| validate(&table));
    if !report.is_empty() {
        return Ok(YearResult::ValidationFailed {
            path: store.path_for(year),
            report,
        });
    }

    // =========================================================================
    // Stage 9: Persist
    // =========================================================================
    let path = store.write(year, &table)?;
    let rows = table.height();
    info!(
        year,
        rows,
        duration_ms = start.elapsed().as_millis(),
        "year processed"
    );

    Ok(YearResult::Persisted {
        path,
        rows,
        stages: Box::new(StageReport {
            matches,
            recode: recode_stats,
            balanced_rows,
            clipped: clipped.values().sum(),
            corrections,
            scaling,
            final_duplicates,
        }),
    })
}
