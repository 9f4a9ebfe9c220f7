//! Canonical feature set shared by every stage of the pipeline.
//!
//! Each accepted survey year is reduced to exactly these eleven columns, in
//! declaration order. The order is part of the output contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Statistical kind of a canonical feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Binary target label.
    Target,
    /// Binary indicator restricted to {0, 1}.
    Binary,
    /// Real-valued measurement.
    Continuous,
    /// Ordered category code.
    Ordinal,
}

impl FeatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Target => "target",
            Self::Binary => "binary",
            Self::Continuous => "continuous",
            Self::Ordinal => "ordinal",
        }
    }

    /// Target and binary columns both carry {0, 1} integers.
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Target | Self::Binary)
    }
}

/// One canonical output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "Diabetes_01")]
    Diabetes01,
    HighBP,
    HighChol,
    #[serde(rename = "BMI")]
    Bmi,
    Smoker,
    PhysActivity,
    Fruits,
    Veggies,
    DiffWalk,
    Sex,
    Age,
}

impl Feature {
    /// All canonical features in output order.
    pub const ALL: [Feature; 11] = [
        Feature::Diabetes01,
        Feature::HighBP,
        Feature::HighChol,
        Feature::Bmi,
        Feature::Smoker,
        Feature::PhysActivity,
        Feature::Fruits,
        Feature::Veggies,
        Feature::DiffWalk,
        Feature::Sex,
        Feature::Age,
    ];

    /// The binary target label.
    pub const TARGET: Feature = Feature::Diabetes01;

    /// Column name used in canonical tables and output files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Diabetes01 => "Diabetes_01",
            Self::HighBP => "HighBP",
            Self::HighChol => "HighChol",
            Self::Bmi => "BMI",
            Self::Smoker => "Smoker",
            Self::PhysActivity => "PhysActivity",
            Self::Fruits => "Fruits",
            Self::Veggies => "Veggies",
            Self::DiffWalk => "DiffWalk",
            Self::Sex => "Sex",
            Self::Age => "Age",
        }
    }

    pub fn kind(&self) -> FeatureKind {
        match self {
            Self::Diabetes01 => FeatureKind::Target,
            Self::Bmi => FeatureKind::Continuous,
            Self::Age => FeatureKind::Ordinal,
            _ => FeatureKind::Binary,
        }
    }

    /// Position of the feature in the canonical column order.
    pub fn position(&self) -> usize {
        Self::ALL
            .iter()
            .position(|feature| feature == self)
            .unwrap_or_default()
    }

    /// Canonical column names in output order.
    pub fn column_names() -> Vec<&'static str> {
        Self::ALL.iter().map(Feature::name).collect()
    }

    /// Continuous features: the only columns clipped, corrected and scaled.
    pub fn continuous() -> impl Iterator<Item = Feature> {
        Self::ALL
            .into_iter()
            .filter(|feature| feature.kind() == FeatureKind::Continuous)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|feature| feature.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownFeature {
                name: trimmed.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_stable() {
        assert_eq!(
            Feature::column_names(),
            vec![
                "Diabetes_01",
                "HighBP",
                "HighChol",
                "BMI",
                "Smoker",
                "PhysActivity",
                "Fruits",
                "Veggies",
                "DiffWalk",
                "Sex",
                "Age",
            ]
        );
        assert_eq!(Feature::Bmi.position(), 3);
        assert_eq!(Feature::Age.position(), 10);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("diabetes_01".parse::<Feature>().unwrap(), Feature::Diabetes01);
        assert_eq!(" bmi ".parse::<Feature>().unwrap(), Feature::Bmi);
        assert!("Income".parse::<Feature>().is_err());
    }

    #[test]
    fn only_bmi_is_continuous() {
        let continuous: Vec<_> = Feature::continuous().collect();
        assert_eq!(continuous, vec![Feature::Bmi]);
        assert!(Feature::Diabetes01.kind().is_binary());
        assert!(!Feature::Age.kind().is_binary());
    }
}
