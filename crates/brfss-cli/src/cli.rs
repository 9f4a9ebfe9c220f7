//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "brfss-pipeline",
    version,
    about = "BRFSS diabetes indicators - build one cleaned table per survey year",
    long_about = "Walk the BRFSS survey years forward from the last persisted year, \
                  map each release onto the canonical diabetes indicator features, \
                  clean, balance and standardize it, validate it and write one parquet \
                  file per accepted year.\n\n\
                  Balancing, clipping, power correction and scaling are fitted on each \
                  year alone, so scaled values are not comparable across years."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Configuration file (default: ./brfss.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write diagnostic logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process survey years until one is not published.
    Run(RunArgs),

    /// List persisted years and the year the next run starts from.
    Status(StatusArgs),

    /// Print the effective feature map and recode rules.
    Features,
}

#[derive(Parser)]
pub struct RunArgs {
    /// First year to attempt (default: last persisted year + 1).
    #[arg(long = "start-year", value_name = "YEAR")]
    pub start_year: Option<i32>,

    /// Directory holding (or receiving) the raw transport files.
    #[arg(long = "raw-dir", value_name = "DIR")]
    pub raw_dir: Option<PathBuf>,

    /// Directory for the per-year parquet outputs.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory for run.log and validation_summary.log.
    #[arg(long = "log-dir", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Only use transport files already in the raw directory.
    #[arg(long = "offline")]
    pub offline: bool,
}

#[derive(Parser)]
pub struct StatusArgs {
    /// Directory for the per-year parquet outputs.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
