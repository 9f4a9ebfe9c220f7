//! Per-table feature scaling.

use std::fmt;
use std::str::FromStr;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TransformError};
use crate::frame::{column_values, replace_f64};
use crate::stats::{mean, std_dev};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMethod {
    /// Rescale to `[0, 1]`.
    #[serde(alias = "min-max")]
    MinMax,
    /// Z-score with the population standard deviation.
    Standard,
}

impl ScaleMethod {
    pub const EXPECTED: &'static str = "minmax, standard";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinMax => "minmax",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for ScaleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaleMethod {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minmax" | "min-max" | "min_max" => Ok(Self::MinMax),
            "standard" | "zscore" | "z-score" => Ok(Self::Standard),
            _ => Err(TransformError::UnknownMethod {
                kind: "scaling",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// Fitted affine parameters: `scaled = (value - offset) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleParams {
    pub column: String,
    pub method: ScaleMethod,
    pub offset: f64,
    /// Zero for a constant column, which scales to all zeros.
    pub scale: f64,
}

impl ScaleParams {
    pub fn fit(column: &str, method: ScaleMethod, values: &[f64]) -> Option<Self> {
        let (offset, scale) = match method {
            ScaleMethod::MinMax => {
                let low = values.iter().copied().reduce(f64::min)?;
                let high = values.iter().copied().reduce(f64::max)?;
                (low, high - low)
            }
            ScaleMethod::Standard => (mean(values)?, std_dev(values, 0)?),
        };
        Some(Self {
            column: column.to_string(),
            method,
            offset,
            scale,
        })
    }

    pub fn apply(&self, value: f64) -> f64 {
        if self.scale > 0.0 {
            (value - self.offset) / self.scale
        } else {
            0.0
        }
    }
}

/// Fit and apply `method` to each listed column of this table alone.
pub fn scale(
    table: &DataFrame,
    columns: &[&str],
    method: ScaleMethod,
) -> Result<(DataFrame, Vec<ScaleParams>)> {
    let mut scaled = table.clone();
    let mut fitted = Vec::with_capacity(columns.len());
    for column in columns {
        let values = column_values(table, column)?;
        let params = ScaleParams::fit(column, method, &values)
            .ok_or(TransformError::EmptyTable { stage: "scaling" })?;
        info!(
            column = %params.column,
            method = %params.method,
            offset = params.offset,
            scale = params.scale,
            "scaler fitted"
        );
        let values = values.into_iter().map(|v| params.apply(v)).collect();
        replace_f64(&mut scaled, column, values)?;
        fitted.push(params);
    }
    Ok((scaled, fitted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    fn bmi(values: Vec<f64>) -> DataFrame {
        DataFrame::new(vec![Series::new("BMI".into(), values).into()]).unwrap()
    }

    #[test]
    fn standard_scaling_uses_population_deviation() {
        let table = bmi(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let (out, params) = scale(&table, &["BMI"], ScaleMethod::Standard).unwrap();
        assert_eq!(params[0].offset, 5.0);
        assert!((params[0].scale - 2.0).abs() < 1e-12);
        let values = column_values(&out, "BMI").unwrap();
        assert!((values[0] + 1.5).abs() < 1e-12);
        assert!((values[7] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn minmax_maps_to_unit_interval() {
        let table = bmi(vec![10.0, 15.0, 30.0]);
        let (out, _) = scale(&table, &["BMI"], ScaleMethod::MinMax).unwrap();
        assert_eq!(column_values(&out, "BMI").unwrap(), vec![0.0, 0.25, 1.0]);
    }

    #[test]
    fn constant_column_becomes_zeros() {
        let table = bmi(vec![27.5; 4]);
        for method in [ScaleMethod::MinMax, ScaleMethod::Standard] {
            let (out, params) = scale(&table, &["BMI"], method).unwrap();
            assert_eq!(params[0].scale, 0.0);
            assert_eq!(column_values(&out, "BMI").unwrap(), vec![0.0; 4]);
        }
    }

    #[test]
    fn parses_method_names() {
        assert_eq!("MinMax".parse::<ScaleMethod>().unwrap(), ScaleMethod::MinMax);
        assert_eq!(" standard ".parse::<ScaleMethod>().unwrap(), ScaleMethod::Standard);
        assert!("robust".parse::<ScaleMethod>().is_err());
    }
}
