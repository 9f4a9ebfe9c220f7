//! First-match alias resolution from raw survey columns to canonical features.

use std::collections::{BTreeSet, HashSet};

use brfss_model::{Feature, FeatureMap};
use polars::prelude::{Column, DataFrame, DataType};
use tracing::{debug, warn};

use crate::error::Result;
use crate::lookup::CaseInsensitiveSet;

/// The source column chosen for a canonical feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMatch {
    pub feature: Feature,
    /// Source column name as spelled in the raw table.
    pub source: String,
    /// Whether the alias only matched ignoring case.
    pub case_folded: bool,
}

/// Result of mapping one year's raw table.
#[derive(Debug, Clone)]
pub struct MappedTable {
    /// Canonical table; `None` whenever any feature is missing.
    pub table: Option<DataFrame>,
    /// Features with no matching source column.
    pub missing: BTreeSet<Feature>,
    /// Winning alias per resolved feature, in canonical order.
    pub matches: Vec<ColumnMatch>,
}

impl MappedTable {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing_names(&self) -> Vec<&'static str> {
        self.missing.iter().map(Feature::name).collect()
    }
}

/// Resolve every canonical feature against `raw`'s columns.
///
/// For each feature, aliases are tried in priority order and the first alias
/// present in any spelling wins; a lower-priority alias is never preferred
/// for matching case exactly. A source column is never assigned to two
/// features. The
/// resulting table holds the canonical columns, in canonical order, as
/// `Float64`.
pub fn map_columns(raw: &DataFrame, feature_map: &FeatureMap) -> Result<MappedTable> {
    let names: Vec<String> = raw
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let exact: HashSet<&str> = names.iter().map(String::as_str).collect();
    let folded = CaseInsensitiveSet::new(&names);

    let mut used: HashSet<String> = HashSet::new();
    let mut matches = Vec::with_capacity(Feature::ALL.len());
    let mut missing = BTreeSet::new();

    for feature in Feature::ALL {
        let aliases = feature_map.aliases(feature);
        let hit = aliases
            .iter()
            .find_map(|alias| resolve_alias(alias, &exact, &folded, &used));

        match hit {
            Some((source, case_folded)) => {
                debug!(feature = %feature, source = %source, case_folded, "resolved feature");
                used.insert(source.clone());
                matches.push(ColumnMatch {
                    feature,
                    source,
                    case_folded,
                });
            }
            None => {
                missing.insert(feature);
            }
        }
    }

    if !missing.is_empty() {
        let missing_names: Vec<&str> = missing.iter().map(Feature::name).collect();
        warn!(missing = ?missing_names, "canonical features incomplete");
        return Ok(MappedTable {
            table: None,
            missing,
            matches,
        });
    }

    let mut columns: Vec<Column> = Vec::with_capacity(matches.len());
    for column_match in &matches {
        let mut column = raw
            .column(&column_match.source)?
            .cast(&DataType::Float64)?;
        column.rename(column_match.feature.name().into());
        columns.push(column);
    }
    let table = DataFrame::new(columns)?;

    Ok(MappedTable {
        table: Some(table),
        missing,
        matches,
    })
}

/// Source column for one alias: the exact spelling if present, otherwise a
/// case-insensitive match. Columns already taken are skipped.
fn resolve_alias(
    alias: &str,
    exact: &HashSet<&str>,
    folded: &CaseInsensitiveSet,
    used: &HashSet<String>,
) -> Option<(String, bool)> {
    if exact.contains(alias) && !used.contains(alias) {
        return Some((alias.to_string(), false));
    }
    folded
        .get(alias)
        .filter(|source| !used.contains(*source))
        .map(|source| (source.to_string(), true))
}
