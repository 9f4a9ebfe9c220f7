//! IBM System/360 hexadecimal floating point conversion.
//!
//! XPT numerics are stored as big-endian IBM doubles: one sign bit, a 7-bit
//! base-16 exponent biased by 64, and a 56-bit fraction. Missing values are
//! encoded as a single marker byte (`.`, `_` or `A`-`Z`) followed by zeros.

use crate::error::{Result, XptError};

const STANDARD_MISSING: u8 = b'.';

/// Returns true when the bytes encode a SAS missing value.
pub fn is_missing(bytes: &[u8]) -> bool {
    let Some((&first, rest)) = bytes.split_first() else {
        return true;
    };
    let marker = first == STANDARD_MISSING || first == b'_' || first.is_ascii_uppercase();
    marker && rest.iter().all(|&b| b == 0)
}

/// Convert an IBM double to IEEE 754.
pub fn ibm_to_ieee(bytes: [u8; 8]) -> f64 {
    let negative = bytes[0] & 0x80 != 0;
    let exponent = i32::from(bytes[0] & 0x7f) - 64;
    let mantissa = bytes[1..]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    if mantissa == 0 {
        return 0.0;
    }
    let magnitude = mantissa as f64 * 2f64.powi(4 * exponent - 56);
    if negative { -magnitude } else { magnitude }
}

/// Convert an IEEE 754 double to IBM representation.
///
/// NaN is written as the standard missing value.
pub fn ieee_to_ibm(value: f64) -> Result<[u8; 8]> {
    if value.is_nan() {
        return Ok(missing_bytes());
    }
    if value == 0.0 {
        return Ok([0u8; 8]);
    }
    if value.is_infinite() {
        return Err(XptError::FloatConversion {
            message: format!("{value} has no IBM representation"),
        });
    }

    let sign = if value < 0.0 { 0x80u8 } else { 0 };
    let mut fraction = value.abs();
    let mut exponent: i32 = 0;
    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 0.0625 {
        fraction *= 16.0;
        exponent -= 1;
    }

    let mut mantissa = (fraction * 2f64.powi(56)).round() as u64;
    if mantissa >= 1u64 << 56 {
        mantissa >>= 4;
        exponent += 1;
    }

    let biased = exponent + 64;
    if !(0..=127).contains(&biased) {
        return Err(XptError::FloatConversion {
            message: format!("{value} is outside the IBM exponent range"),
        });
    }

    let mut bytes = [0u8; 8];
    bytes[0] = sign | biased as u8;
    bytes[1..].copy_from_slice(&mantissa.to_be_bytes()[1..]);
    Ok(bytes)
}

/// Bytes of the standard `.` missing value.
pub fn missing_bytes() -> [u8; 8] {
    [STANDARD_MISSING, 0, 0, 0, 0, 0, 0, 0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_encodings() {
        assert_eq!(ibm_to_ieee([0x41, 0x10, 0, 0, 0, 0, 0, 0]), 1.0);
        assert_eq!(ibm_to_ieee([0xc1, 0x10, 0, 0, 0, 0, 0, 0]), -1.0);
        assert_eq!(ibm_to_ieee([0x42, 0x64, 0, 0, 0, 0, 0, 0]), 100.0);
        assert_eq!(ieee_to_ibm(1.0).unwrap(), [0x41, 0x10, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ieee_to_ibm(0.0).unwrap(), [0u8; 8]);
    }

    #[test]
    fn missing_markers() {
        assert!(is_missing(&missing_bytes()));
        assert!(is_missing(&[b'A', 0, 0, 0, 0, 0, 0, 0]));
        assert!(is_missing(&[b'_', 0, 0, 0, 0, 0, 0, 0]));
        assert!(!is_missing(&[0x41, 0x10, 0, 0, 0, 0, 0, 0]));
        assert!(is_missing(&ieee_to_ibm(f64::NAN).unwrap()));
    }

    #[test]
    fn infinity_is_rejected() {
        assert!(ieee_to_ibm(f64::INFINITY).is_err());
    }

    proptest! {
        #[test]
        fn survey_range_values_survive_conversion(value in -1.0e6f64..1.0e6) {
            let back = ibm_to_ieee(ieee_to_ibm(value).unwrap());
            prop_assert!((back - value).abs() <= value.abs() * 1e-14);
        }
    }
}
