//! Alias table from canonical features to survey source variables.
//!
//! Survey releases rename variables between years (`DIABETE3` became
//! `DIABETE4`, `SEX` became `SEXVAR`, ...). A [`FeatureMap`] lists, for each
//! canonical feature, the accepted source names in priority order.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{ModelError, Result};
use crate::feature::Feature;

const EMBEDDED_FEATURE_MAP: &str = include_str!("../feature_map.toml");

/// Ordered aliases for a single canonical feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureAliases {
    pub feature: Feature,
    pub aliases: Vec<String>,
}

/// Canonical feature to source-alias mapping.
///
/// Always holds one non-empty alias list per canonical feature, stored in
/// canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureMap {
    entries: Vec<FeatureAliases>,
}

impl FeatureMap {
    /// The alias table compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_FEATURE_MAP)
    }

    /// Parse a complete alias table (`Feature = ["ALIAS", ...]`).
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: BTreeMap<String, Vec<String>> =
            toml::from_str(text).map_err(|error| ModelError::FeatureMapParse {
                message: error.to_string(),
            })?;
        Self::from_table(&table)
    }

    /// Build from a name-keyed table; every canonical feature must be present.
    pub fn from_table(table: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut resolved: BTreeMap<Feature, Vec<String>> = BTreeMap::new();
        for (name, aliases) in table {
            let feature: Feature = name.parse()?;
            resolved.insert(feature, normalize_aliases(feature, aliases)?);
        }

        let mut entries = Vec::with_capacity(Feature::ALL.len());
        for feature in Feature::ALL {
            let aliases = resolved
                .remove(&feature)
                .ok_or(ModelError::MissingAliases { feature })?;
            entries.push(FeatureAliases { feature, aliases });
        }
        Ok(Self { entries })
    }

    /// Replace the alias lists of the features named in `overrides`.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        for (name, aliases) in overrides {
            let feature: Feature = name.parse()?;
            let normalized = normalize_aliases(feature, aliases)?;
            if let Some(entry) = self.entries.iter_mut().find(|e| e.feature == feature) {
                entry.aliases = normalized;
            }
        }
        Ok(self)
    }

    /// Aliases for one feature in priority order.
    pub fn aliases(&self, feature: Feature) -> &[String] {
        self.entries
            .iter()
            .find(|entry| entry.feature == feature)
            .map(|entry| entry.aliases.as_slice())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureAliases> {
        self.entries.iter()
    }

    /// Every alias across all features, uppercased.
    ///
    /// Used to project raw survey tables down to the columns the mapper can
    /// ever select.
    pub fn all_aliases(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .flat_map(|entry| entry.aliases.iter())
            .map(|alias| alias.to_ascii_uppercase())
            .collect()
    }
}

fn normalize_aliases(feature: Feature, aliases: &[String]) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    let mut normalized = Vec::with_capacity(aliases.len());
    for alias in aliases {
        let alias = alias.trim();
        if alias.is_empty() {
            continue;
        }
        if seen.insert(alias.to_ascii_uppercase()) {
            normalized.push(alias.to_string());
        }
    }
    if normalized.is_empty() {
        return Err(ModelError::MissingAliases { feature });
    }
    Ok(normalized)
}
