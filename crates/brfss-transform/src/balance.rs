//! Stratified undersampling against the target label.

use std::collections::BTreeMap;

use polars::prelude::{DataFrame, DataType, IdxCa, IdxSize, NewChunkedArray};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::info;

use crate::error::{Result, TransformError};

/// Requested rows per label value.
pub type TargetCounts = BTreeMap<i64, usize>;

/// Row indices grouped by label value.
fn label_groups(table: &DataFrame, label: &str) -> Result<BTreeMap<i64, Vec<usize>>> {
    let column = table
        .column(label)
        .map_err(|_| TransformError::ColumnNotFound {
            column: label.to_string(),
        })?
        .cast(&DataType::Int64)?;
    let values = column.i64()?;

    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    let mut missing = 0usize;
    for (idx, value) in values.into_iter().enumerate() {
        match value {
            Some(value) => groups.entry(value).or_default().push(idx),
            None => missing += 1,
        }
    }
    if missing > 0 {
        return Err(TransformError::MissingValues {
            column: label.to_string(),
            count: missing,
        });
    }
    Ok(groups)
}

/// Observed row count per label value.
pub fn class_counts(table: &DataFrame, label: &str) -> Result<TargetCounts> {
    Ok(label_groups(table, label)?
        .into_iter()
        .map(|(value, rows)| (value, rows.len()))
        .collect())
}

/// Targets that cap the negative class and keep every positive row.
pub fn binary_targets(table: &DataFrame, label: &str, majority_cap: usize) -> Result<TargetCounts> {
    let counts = class_counts(table, label)?;
    let positives = counts.get(&1).copied().unwrap_or_default();
    Ok(TargetCounts::from([(0, majority_cap), (1, positives)]))
}

/// Sample each label group down to its target count without replacement.
///
/// Groups with no target keep all rows. Output rows are grouped by label in
/// ascending order and keep their original relative order within a group.
/// The selection is fully determined by `seed`.
pub fn undersample(
    table: &DataFrame,
    label: &str,
    targets: &TargetCounts,
    seed: u64,
) -> Result<DataFrame> {
    let groups = label_groups(table, label)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut selected: Vec<IdxSize> = Vec::new();
    for (value, mut rows) in groups {
        let available = rows.len();
        let wanted = targets.get(&value).copied().unwrap_or(available).min(available);
        if wanted < available {
            let (chosen, _) = rows.partial_shuffle(&mut rng, wanted);
            let mut chosen = chosen.to_vec();
            chosen.sort_unstable();
            rows = chosen;
        }
        info!(label = value, available, kept = rows.len(), "class sampled");
        selected.extend(rows.into_iter().map(|idx| idx as IdxSize));
    }

    let indices = IdxCa::from_vec("idx".into(), selected);
    Ok(table.take(&indices)?)
}
