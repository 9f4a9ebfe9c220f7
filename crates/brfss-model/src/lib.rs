//! Canonical data model for the BRFSS diabetes pipeline.

pub mod error;
pub mod feature;
pub mod feature_map;
pub mod outcome;
pub mod rules;

pub use error::{ModelError, Result};
pub use feature::{Feature, FeatureKind};
pub use feature_map::{FeatureAliases, FeatureMap};
pub use outcome::YearOutcome;
pub use rules::{AGE_UNKNOWN, BMI_DIVISOR, RECODE_RULES, RecodeRule, TARGET_ACCEPTED, TARGET_POSITIVE};
