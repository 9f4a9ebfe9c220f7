//! Run configuration loaded from `brfss.toml`.
//!
//! Every key has a default, so a missing file is equivalent to an empty one.
//! Unknown keys and unknown method names are rejected at load time.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use brfss_ingest::YEAR_PLACEHOLDER;
use brfss_model::{FeatureMap, ModelError};
use brfss_transform::{DEFAULT_SKEW_THRESHOLD, PowerMethod, ScaleMethod};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "brfss.toml";

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://www.cdc.gov/brfss/annual_data/{year}/files/LLCP{year}XPT.zip";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {message}")]
    Invalid { message: String },

    #[error("invalid feature map: {0}")]
    FeatureMap(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    /// First year walked when nothing has been persisted yet.
    pub start_year: i32,
    /// Archive URL with `{year}` placeholders.
    pub url_template: String,
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            start_year: 2015,
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            raw_dir: PathBuf::from("data/raw"),
            processed_dir: PathBuf::from("data/processed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogsConfig {
    pub dir: PathBuf,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// Rows kept from the negative class per year.
    pub majority_cap: usize,
    pub seed: u64,
    pub power_method: PowerMethod,
    pub skew_threshold: f64,
    pub scale_method: ScaleMethod,
    /// Upper bound on years attempted in one run.
    pub max_years: u32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            majority_cap: 70_000,
            seed: 42,
            power_method: PowerMethod::BoxCox,
            skew_threshold: DEFAULT_SKEW_THRESHOLD,
            scale_method: ScaleMethod::Standard,
            max_years: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub logs: LogsConfig,
    pub transform: TransformConfig,
    /// Alias lists replacing the embedded ones, keyed by canonical name.
    pub features: BTreeMap<String, Vec<String>>,
}

impl Config {
    /// Load `path`, or `brfss.toml` when present, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    let config = Self::default();
                    config.validate()?;
                    return Ok(config);
                }
                default
            }
        };
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml_str(&text, &path)
    }

    /// Parse and validate TOML text; `origin` is only used in errors.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.dataset.url_template.contains(YEAR_PLACEHOLDER) {
            return Err(invalid(format!(
                "dataset.url_template must contain {YEAR_PLACEHOLDER}"
            )));
        }
        let threshold = self.transform.skew_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(invalid(format!(
                "transform.skew_threshold must be a non-negative number, got {threshold}"
            )));
        }
        if self.transform.max_years == 0 {
            return Err(invalid("transform.max_years must be at least 1".to_string()));
        }
        self.feature_map()?;
        Ok(())
    }

    /// Embedded feature map with `[features]` overrides applied.
    pub fn feature_map(&self) -> Result<FeatureMap> {
        Ok(FeatureMap::embedded()?.with_overrides(&self.features)?)
    }

    /// Apply directory overrides from the command line.
    pub fn apply_overrides(
        &mut self,
        raw_dir: Option<&Path>,
        output_dir: Option<&Path>,
        log_dir: Option<&Path>,
    ) {
        if let Some(dir) = raw_dir {
            self.dataset.raw_dir = dir.to_path_buf();
        }
        if let Some(dir) = output_dir {
            self.dataset.processed_dir = dir.to_path_buf();
        }
        if let Some(dir) = log_dir {
            self.logs.dir = dir.to_path_buf();
        }
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config> {
        Config::from_toml_str(text, Path::new("brfss.toml"))
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.transform.majority_cap, 70_000);
        assert_eq!(config.transform.power_method, PowerMethod::BoxCox);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse(
            r#"
            [dataset]
            start_year = 2011

            [transform]
            power_method = "yeo-johnson"
            scale_method = "minmax"
            "#,
        )
        .unwrap();
        assert_eq!(config.dataset.start_year, 2011);
        assert_eq!(config.dataset.raw_dir, PathBuf::from("data/raw"));
        assert_eq!(config.transform.power_method, PowerMethod::YeoJohnson);
        assert_eq!(config.transform.scale_method, ScaleMethod::MinMax);
        assert_eq!(config.transform.seed, 42);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let error = parse("[transform]\npower_method = \"quantile\"\n").unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn url_template_needs_year_placeholder() {
        let error = parse("[dataset]\nurl_template = \"https://example.org/data.zip\"\n")
            .unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { .. }));
    }

    #[test]
    fn feature_overrides_are_checked() {
        let config = parse("[features]\nSmoker = [\"SMOKE100\", \"SMOKER3\"]\n").unwrap();
        let map = config.feature_map().unwrap();
        assert_eq!(
            map.aliases(brfss_model::Feature::Smoker),
            ["SMOKE100".to_string(), "SMOKER3".to_string()]
        );

        let error = parse("[features]\nSmokes = [\"SMOKE100\"]\n").unwrap_err();
        assert!(matches!(error, ConfigError::FeatureMap(_)));
    }

    #[test]
    fn cli_overrides_replace_directories() {
        let mut config = Config::default();
        config.apply_overrides(None, Some(Path::new("/tmp/out")), Some(Path::new("/tmp/logs")));
        assert_eq!(config.dataset.raw_dir, PathBuf::from("data/raw"));
        assert_eq!(config.dataset.processed_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.logs.dir, PathBuf::from("/tmp/logs"));
    }
}
