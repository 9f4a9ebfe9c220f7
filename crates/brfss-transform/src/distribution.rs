//! Skewness-triggered power transforms.
//!
//! A column whose absolute skewness exceeds the threshold is reshaped with
//! the configured method. Box-Cox and Yeo-Johnson fit their exponent by
//! maximum likelihood on the column alone and standardize the result.

use std::fmt;
use std::str::FromStr;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TransformError};
use crate::frame::{column_values, replace_f64};
use crate::stats::{mean, skewness, std_dev};

/// Default absolute skewness above which a column is transformed.
pub const DEFAULT_SKEW_THRESHOLD: f64 = 0.75;

const LAMBDA_MIN: f64 = -10.0;
const LAMBDA_MAX: f64 = 10.0;
const LAMBDA_STEP: f64 = 0.1;
const LAMBDA_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerMethod {
    /// `ln(x + 1)`.
    Log,
    /// Requires strictly positive input.
    BoxCox,
    /// Defined for any real input.
    YeoJohnson,
}

impl PowerMethod {
    pub const EXPECTED: &'static str = "log, box-cox, yeo-johnson";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::BoxCox => "box-cox",
            Self::YeoJohnson => "yeo-johnson",
        }
    }

    fn check_domain(&self, column: &str, values: &[f64]) -> Result<()> {
        let minimum = values.iter().copied().fold(f64::INFINITY, f64::min);
        let (ok, requirement) = match self {
            Self::Log => (minimum > -1.0, "values greater than -1"),
            Self::BoxCox => (minimum > 0.0, "strictly positive values"),
            Self::YeoJohnson => (true, ""),
        };
        if ok {
            Ok(())
        } else {
            Err(TransformError::InvalidDomain {
                column: column.to_string(),
                method: self.as_str(),
                requirement,
                minimum,
            })
        }
    }
}

impl fmt::Display for PowerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerMethod {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "log" => Ok(Self::Log),
            "box-cox" | "boxcox" => Ok(Self::BoxCox),
            "yeo-johnson" | "yeojohnson" => Ok(Self::YeoJohnson),
            _ => Err(TransformError::UnknownMethod {
                kind: "power transform",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// Outcome of the skewness check for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionRecord {
    pub column: String,
    /// Skewness before any transform.
    pub skewness: f64,
    pub transformed: bool,
    pub method: PowerMethod,
    /// Fitted exponent; `None` for `log` and untouched columns.
    pub lambda: Option<f64>,
}

/// Transform every listed column whose `|skewness| > threshold`.
pub fn correct(
    table: &DataFrame,
    columns: &[&str],
    method: PowerMethod,
    threshold: f64,
) -> Result<(DataFrame, Vec<CorrectionRecord>)> {
    let mut corrected = table.clone();
    let mut records = Vec::with_capacity(columns.len());

    for column in columns {
        let values = column_values(table, column)?;
        let skew = skewness(&values).ok_or(TransformError::EmptyTable {
            stage: "distribution correction",
        })?;

        let mut record = CorrectionRecord {
            column: (*column).to_string(),
            skewness: skew,
            transformed: false,
            method,
            lambda: None,
        };
        if skew.abs() > threshold {
            method.check_domain(column, &values)?;
            let (reshaped, lambda) = apply(method, &values);
            replace_f64(&mut corrected, column, reshaped)?;
            record.transformed = true;
            record.lambda = lambda;
        }
        info!(
            column = %record.column,
            skewness = record.skewness,
            transformed = record.transformed,
            method = %record.method,
            lambda = ?record.lambda,
            "distribution check"
        );
        records.push(record);
    }
    Ok((corrected, records))
}

fn apply(method: PowerMethod, values: &[f64]) -> (Vec<f64>, Option<f64>) {
    match method {
        PowerMethod::Log => (values.iter().map(|x| x.ln_1p()).collect(), None),
        PowerMethod::BoxCox => {
            let lambda = fit_lambda(|l| box_cox_llf(values, l));
            let out = values.iter().map(|x| box_cox(*x, lambda)).collect();
            (standardize(out), Some(lambda))
        }
        PowerMethod::YeoJohnson => {
            let lambda = fit_lambda(|l| yeo_johnson_llf(values, l));
            let out = values.iter().map(|x| yeo_johnson(*x, lambda)).collect();
            (standardize(out), Some(lambda))
        }
    }
}

pub fn box_cox(x: f64, lambda: f64) -> f64 {
    if lambda.abs() < 1e-12 {
        x.ln()
    } else {
        (x.powf(lambda) - 1.0) / lambda
    }
}

pub fn yeo_johnson(x: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        if lambda.abs() < 1e-12 {
            x.ln_1p()
        } else {
            ((x + 1.0).powf(lambda) - 1.0) / lambda
        }
    } else if (lambda - 2.0).abs() < 1e-12 {
        -(-x).ln_1p()
    } else {
        -((1.0 - x).powf(2.0 - lambda) - 1.0) / (2.0 - lambda)
    }
}

/// Profile log-likelihood of a transformed sample, up to a constant.
fn normal_llf(transformed: impl Iterator<Item = f64>, jacobian: f64, n: f64) -> f64 {
    let transformed: Vec<f64> = transformed.collect();
    match std_dev(&transformed, 0) {
        Some(sd) if sd > 0.0 && sd.is_finite() => jacobian - n * sd.ln(),
        _ => f64::NEG_INFINITY,
    }
}

fn box_cox_llf(values: &[f64], lambda: f64) -> f64 {
    let n = values.len() as f64;
    let log_sum: f64 = values.iter().map(|x| x.ln()).sum();
    normal_llf(
        values.iter().map(|x| box_cox(*x, lambda)),
        (lambda - 1.0) * log_sum,
        n,
    )
}

fn yeo_johnson_llf(values: &[f64], lambda: f64) -> f64 {
    let n = values.len() as f64;
    let log_sum: f64 = values.iter().map(|x| x.signum() * x.abs().ln_1p()).sum();
    normal_llf(
        values.iter().map(|x| yeo_johnson(*x, lambda)),
        (lambda - 1.0) * log_sum,
        n,
    )
}

/// Maximize a log-likelihood over lambda: coarse grid, then golden-section
/// refinement around the best grid point.
fn fit_lambda(llf: impl Fn(f64) -> f64) -> f64 {
    let steps = ((LAMBDA_MAX - LAMBDA_MIN) / LAMBDA_STEP).round() as usize;
    let mut best = (1.0, f64::NEG_INFINITY);
    for i in 0..=steps {
        let lambda = LAMBDA_MIN + i as f64 * LAMBDA_STEP;
        let value = llf(lambda);
        if value.is_finite() && value > best.1 {
            best = (lambda, value);
        }
    }
    if !best.1.is_finite() {
        return 1.0;
    }

    let inv_phi = (5f64.sqrt() - 1.0) / 2.0;
    let mut a = (best.0 - LAMBDA_STEP).max(LAMBDA_MIN);
    let mut b = (best.0 + LAMBDA_STEP).min(LAMBDA_MAX);
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    while (b - a).abs() > LAMBDA_TOLERANCE {
        if llf(c) >= llf(d) {
            b = d;
        } else {
            a = c;
        }
        c = b - inv_phi * (b - a);
        d = a + inv_phi * (b - a);
    }
    let refined = (a + b) / 2.0;
    if llf(refined) >= best.1 {
        refined
    } else {
        best.0
    }
}

/// Zero mean and unit population variance; a constant sample is centred only.
fn standardize(values: Vec<f64>) -> Vec<f64> {
    let Some(center) = mean(&values) else {
        return values;
    };
    let spread = std_dev(&values, 0).filter(|sd| *sd > 0.0).unwrap_or(1.0);
    values.into_iter().map(|v| (v - center) / spread).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    fn frame(name: &str, values: Vec<f64>) -> DataFrame {
        DataFrame::new(vec![Series::new(name.into(), values).into()]).unwrap()
    }

    /// Log-normal style sample: symmetric after a log transform.
    fn log_symmetric() -> Vec<f64> {
        [-2.0, -1.5, -1.0, -0.5, 0.0, 0.0, 0.5, 1.0, 1.5, 2.0]
            .iter()
            .map(|k: &f64| k.exp())
            .collect()
    }

    #[test]
    fn parses_method_names() {
        assert_eq!("box-cox".parse::<PowerMethod>().unwrap(), PowerMethod::BoxCox);
        assert_eq!("Yeo_Johnson".parse::<PowerMethod>().unwrap(), PowerMethod::YeoJohnson);
        assert_eq!("LOG".parse::<PowerMethod>().unwrap(), PowerMethod::Log);
        assert!(matches!(
            "quantile".parse::<PowerMethod>(),
            Err(TransformError::UnknownMethod { .. })
        ));
    }

    #[test]
    fn skewed_column_is_transformed_and_standardized() {
        let values = log_symmetric();
        let before = skewness(&values).unwrap();
        assert!(before > 0.75);

        let table = frame("BMI", values);
        let (out, records) = correct(&table, &["BMI"], PowerMethod::BoxCox, 0.75).unwrap();
        let record = &records[0];
        assert!(record.transformed);
        let lambda = record.lambda.unwrap();
        assert!(lambda.abs() < 0.5, "lambda {lambda}");

        let reshaped = column_values(&out, "BMI").unwrap();
        assert!(skewness(&reshaped).unwrap().abs() < before.abs());
        assert!(mean(&reshaped).unwrap().abs() < 1e-9);
        assert!((std_dev(&reshaped, 0).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mild_skew_is_left_alone() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let table = frame("BMI", values);
        let (out, records) = correct(&table, &["BMI"], PowerMethod::BoxCox, 0.75).unwrap();
        assert!(!records[0].transformed);
        assert_eq!(records[0].lambda, None);
        assert!(out.equals(&table));
    }

    #[test]
    fn box_cox_rejects_non_positive_input() {
        let mut values = log_symmetric();
        values[0] = -0.5;
        values[9] = 40.0;
        let table = frame("BMI", values);
        let error = correct(&table, &["BMI"], PowerMethod::BoxCox, 0.75).unwrap_err();
        assert!(matches!(
            error,
            TransformError::InvalidDomain { method: "box-cox", .. }
        ));
    }

    #[test]
    fn yeo_johnson_accepts_negative_input() {
        let mut values = log_symmetric();
        values[0] = -0.5;
        values[9] = 40.0;
        let table = frame("BMI", values);
        let (_, records) = correct(&table, &["BMI"], PowerMethod::YeoJohnson, 0.75).unwrap();
        assert!(records[0].transformed);
        assert!(records[0].lambda.is_some());
    }

    #[test]
    fn log_uses_log1p_without_standardizing() {
        let values = vec![0.0, 0.0, 0.0, 0.0, 1.0, 100.0];
        let table = frame("BMI", values);
        let (out, records) = correct(&table, &["BMI"], PowerMethod::Log, 0.75).unwrap();
        assert!(records[0].transformed);
        let reshaped = column_values(&out, "BMI").unwrap();
        assert_eq!(reshaped[0], 0.0);
        assert!((reshaped[5] - 101f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn transforms_are_continuous_at_their_special_points() {
        assert!((box_cox(3.0, 1e-9) - 3f64.ln()).abs() < 1e-6);
        assert!((yeo_johnson(3.0, 1e-9) - 4f64.ln()).abs() < 1e-6);
        assert!((yeo_johnson(-3.0, 2.0 - 1e-9) + 4f64.ln()).abs() < 1e-6);
        assert_eq!(box_cox(2.0, 1.0), 1.0);
    }
}
