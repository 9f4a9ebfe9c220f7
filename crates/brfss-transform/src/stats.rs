//! Descriptive statistics over complete `f64` samples.
//!
//! Moments and quantiles come from Polars' chunked-array aggregations;
//! skewness is derived from the central moments here.

use polars::prelude::{
    ChunkAgg, ChunkQuantile, ChunkVar, Float64Chunked, NewChunkedArray, QuantileMethod,
};

fn sample(values: &[f64]) -> Float64Chunked {
    Float64Chunked::from_slice("sample".into(), values)
}

/// Arithmetic mean; `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    sample(values).mean()
}

/// Variance with `ddof` delta degrees of freedom (0 = population, 1 = sample).
pub fn variance(values: &[f64], ddof: u8) -> Option<f64> {
    if values.len() <= usize::from(ddof) {
        return None;
    }
    sample(values).var(ddof)
}

pub fn std_dev(values: &[f64], ddof: u8) -> Option<f64> {
    variance(values, ddof).map(f64::sqrt)
}

/// Quantile by linear interpolation between the two nearest order
/// statistics (position `q * (n - 1)`).
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    sample(values)
        .quantile(q, QuantileMethod::Linear)
        .ok()
        .flatten()
}

/// Fisher-Pearson coefficient of skewness, without bias correction.
///
/// `m3 / m2^1.5` with central moments normalised by `n`. A constant sample
/// has zero skewness.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let n = values.len() as f64;
    let (m2, m3) = values.iter().fold((0.0, 0.0), |(m2, m3), v| {
        let d = v - mean;
        (m2 + d * d, m3 + d * d * d)
    });
    let (m2, m3) = (m2 / n, m3 / n);
    if m2 <= f64::EPSILON * mean.abs().max(1.0) {
        return Some(0.0);
    }
    Some(m3 / m2.powf(1.5))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mean_and_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(close(mean(&values).unwrap(), 5.0));
        assert!(close(std_dev(&values, 0).unwrap(), 2.0));
        assert!(close(variance(&values, 1).unwrap(), 32.0 / 7.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(variance(&[1.0], 1), None);
    }

    #[test]
    fn linear_quantiles() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert!(close(quantile(&values, 0.25).unwrap(), 1.75));
        assert!(close(quantile(&values, 0.5).unwrap(), 2.5));
        assert!(close(quantile(&values, 0.75).unwrap(), 3.25));
        assert!(close(quantile(&values, 1.0).unwrap(), 4.0));
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&values, 1.5), None);
    }

    #[test]
    fn skewness_sign_and_symmetry() {
        assert!(close(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(), 0.0));
        assert!(skewness(&[1.0, 1.0, 1.0, 2.0, 10.0]).unwrap() > 1.0);
        assert!(skewness(&[-10.0, 1.0, 2.0, 2.0, 2.0]).unwrap() < -1.0);
        assert_eq!(skewness(&[3.0, 3.0, 3.0]), Some(0.0));
    }

    #[test]
    fn skewness_matches_reference_value() {
        // Biased sample skewness of [1, 2, 3, 10]:
        // mean 4, m2 = 12.5, m3 = 45, skew = 45 / 12.5^1.5.
        let expected = 45.0 / 12.5f64.powf(1.5);
        assert!(close(skewness(&[1.0, 2.0, 3.0, 10.0]).unwrap(), expected));
    }
}
