//! Declarative value-normalization rules for the survey's coded answers.

use crate::feature::Feature;

/// Raw target codes kept by the recoder; everything else is dropped.
pub const TARGET_ACCEPTED: [i64; 4] = [1, 2, 3, 4];

/// Raw target code that maps to the positive class.
pub const TARGET_POSITIVE: i64 = 1;

/// `_BMI5` is reported with two implied decimals.
pub const BMI_DIVISOR: f64 = 100.0;

/// `_AGEG5YR` code for "don't know / refused".
pub const AGE_UNKNOWN: i64 = 14;

/// Drop set and replacement map for one binary feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecodeRule {
    pub feature: Feature,
    /// Sentinel codes ("don't know", "refused", ...) removed before replacing.
    pub drop: &'static [i64],
    /// `(from, to)` pairs applied after dropping.
    pub replace: &'static [(i64, i64)],
}

impl RecodeRule {
    pub fn drops(&self, value: i64) -> bool {
        self.drop.contains(&value)
    }

    /// Replacement for `value`, or `value` itself when no pair matches.
    pub fn apply(&self, value: i64) -> i64 {
        self.replace
            .iter()
            .find(|(from, _)| *from == value)
            .map_or(value, |(_, to)| *to)
    }
}

/// Rules for every binary feature, in canonical order.
///
/// `HighBP` is inverted at the source: 1 means "no" and 2 means "yes".
pub const RECODE_RULES: [RecodeRule; 8] = [
    RecodeRule {
        feature: Feature::HighBP,
        drop: &[9],
        replace: &[(1, 0), (2, 1)],
    },
    RecodeRule {
        feature: Feature::HighChol,
        drop: &[7, 9],
        replace: &[(2, 0)],
    },
    RecodeRule {
        feature: Feature::Smoker,
        drop: &[7, 9],
        replace: &[(2, 0)],
    },
    RecodeRule {
        feature: Feature::PhysActivity,
        drop: &[9],
        replace: &[(2, 0)],
    },
    RecodeRule {
        feature: Feature::Fruits,
        drop: &[9],
        replace: &[(2, 0)],
    },
    RecodeRule {
        feature: Feature::Veggies,
        drop: &[9],
        replace: &[(2, 0)],
    },
    RecodeRule {
        feature: Feature::DiffWalk,
        drop: &[7, 9],
        replace: &[(2, 0)],
    },
    RecodeRule {
        feature: Feature::Sex,
        drop: &[7, 9],
        replace: &[(2, 0)],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureKind;

    #[test]
    fn every_binary_feature_has_a_rule() {
        let binary: Vec<_> = Feature::ALL
            .into_iter()
            .filter(|feature| feature.kind() == FeatureKind::Binary)
            .collect();
        let ruled: Vec<_> = RECODE_RULES.iter().map(|rule| rule.feature).collect();
        assert_eq!(binary, ruled);
    }

    #[test]
    fn high_bp_is_inverted() {
        let rule = RECODE_RULES[0];
        assert_eq!(rule.feature, Feature::HighBP);
        assert_eq!(rule.apply(1), 0);
        assert_eq!(rule.apply(2), 1);
        assert!(rule.drops(9));
        assert!(!rule.drops(7));
    }

    #[test]
    fn unmatched_values_pass_through() {
        let rule = RECODE_RULES[1];
        assert_eq!(rule.apply(1), 1);
        assert_eq!(rule.apply(2), 0);
        assert_eq!(rule.apply(5), 5);
    }
}
