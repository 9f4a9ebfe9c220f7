use anyhow::{Context, Result};
use brfss_cli::config::Config;
use brfss_cli::pipeline::PipelineConfig;
use brfss_cli::run_log::RunLog;
use brfss_cli::walk::{WalkSummary, YearWalker};
use brfss_ingest::{ArchiveSource, DirectorySource, YearSource};
use brfss_model::{Feature, RECODE_RULES};
use brfss_output::OutputStore;
use comfy_table::Table;
use tracing::info;

use crate::cli::{RunArgs, StatusArgs};
use crate::summary::{StatusRow, apply_table_style, header_cell, print_status};

pub fn run_walk(args: &RunArgs, mut config: Config) -> Result<WalkSummary> {
    config.apply_overrides(
        args.raw_dir.as_deref(),
        args.output_dir.as_deref(),
        args.log_dir.as_deref(),
    );
    let pipeline = PipelineConfig::from_config(&config).context("load feature map")?;

    let store = OutputStore::new(&config.dataset.processed_dir);
    let start_year = match args.start_year {
        Some(year) => year,
        None => store
            .resume_year(config.dataset.start_year)
            .context("scan output directory")?,
    };

    let directory = DirectorySource::new(&config.dataset.raw_dir)
        .with_projection(pipeline.feature_map.all_aliases());
    let source: Box<dyn YearSource> = if args.offline {
        Box::new(directory)
    } else {
        Box::new(
            ArchiveSource::new(&config.dataset.url_template, directory)
                .context("create HTTP client")?,
        )
    };

    let mut run_log = RunLog::open(&config.logs.dir)?;
    info!(
        start_year,
        raw_dir = %config.dataset.raw_dir.display(),
        output_dir = %store.dir().display(),
        log_dir = %run_log.dir().display(),
        offline = args.offline,
        "starting year walk"
    );

    YearWalker::new(source.as_ref(), &pipeline, &store, &mut run_log)
        .with_max_years(config.transform.max_years)
        .walk(start_year)
}

pub fn run_status(args: &StatusArgs, mut config: Config) -> Result<()> {
    config.apply_overrides(None, args.output_dir.as_deref(), None);
    let store = OutputStore::new(&config.dataset.processed_dir);
    let persisted = store.list().context("scan output directory")?;

    let mut rows = Vec::with_capacity(persisted.len());
    for entry in &persisted {
        let table = store
            .read(entry.year)
            .with_context(|| format!("read {}", entry.path.display()))?;
        rows.push(StatusRow {
            year: entry.year,
            rows: table.height(),
            path: entry.path.clone(),
        });
    }
    let next = store.resume_year(config.dataset.start_year)?;
    print_status(store.dir(), &rows, next);
    Ok(())
}

pub fn run_features(config: &Config) -> Result<()> {
    let feature_map = config.feature_map().context("load feature map")?;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Feature"),
        header_cell("Kind"),
        header_cell("Aliases (priority order)"),
    ]);
    apply_table_style(&mut table);
    for entry in feature_map.iter() {
        table.add_row(vec![
            entry.feature.name().to_string(),
            entry.feature.kind().as_str().to_string(),
            entry.aliases.join(", "),
        ]);
    }
    println!("{table}");

    let mut rules = Table::new();
    rules.set_header(vec![
        header_cell("Feature"),
        header_cell("Dropped codes"),
        header_cell("Replacements"),
    ]);
    apply_table_style(&mut rules);
    for rule in &RECODE_RULES {
        let dropped: Vec<String> = rule.drop.iter().map(i64::to_string).collect();
        let replaced: Vec<String> = rule
            .replace
            .iter()
            .map(|(from, to)| format!("{from} -> {to}"))
            .collect();
        rules.add_row(vec![
            rule.feature.name().to_string(),
            dropped.join(", "),
            replaced.join(", "),
        ]);
    }
    println!();
    println!(
        "Recode rules (target {} keeps 1 as positive, 2-4 as negative):",
        Feature::TARGET.name()
    );
    println!("{rules}");
    Ok(())
}
