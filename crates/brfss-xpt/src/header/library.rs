//! Library header record handling.
//!
//! # Structure
//!
//! 1. Fixed header: `HEADER RECORD*******LIBRARY HEADER RECORD!!!!!!!...`
//! 2. Real header (80 bytes): SAS version, OS, created datetime
//! 3. Second header (80 bytes): Modified datetime

use crate::error::{Result, XptError};

use super::{DEFAULT_DATETIME, build_fixed_header, write_string};

/// Record length in bytes.
pub const RECORD_LEN: usize = 80;

/// Library header prefix.
pub const LIBRARY_HEADER_PREFIX: &str = "HEADER RECORD*******LIBRARY HEADER RECORD!!!!!!!";

const V8_LIBRARY_PREFIX: &str = "HEADER RECORD*******LIBV8   HEADER RECORD!!!!!!!";

/// Validate that a record starts with the V5 library header prefix.
pub fn validate_library_header(record: &[u8]) -> Result<()> {
    if record.len() < RECORD_LEN {
        return Err(XptError::invalid_format("library header too short"));
    }
    if record.starts_with(V8_LIBRARY_PREFIX.as_bytes()) {
        return Err(XptError::invalid_format("V8 transport files are not supported"));
    }
    if !record.starts_with(LIBRARY_HEADER_PREFIX.as_bytes()) {
        return Err(XptError::missing_header("LIBRARY HEADER"));
    }
    Ok(())
}

#[must_use]
pub fn build_library_header() -> [u8; RECORD_LEN] {
    build_fixed_header(LIBRARY_HEADER_PREFIX)
}

/// Build the real header: `SAS`, `SAS`, `SASLIB`, version, OS, created.
#[must_use]
pub fn build_real_header() -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    write_string(&mut record, 0, "SAS", 8);
    write_string(&mut record, 8, "SAS", 8);
    write_string(&mut record, 16, "SASLIB", 8);
    write_string(&mut record, 24, "9.4", 8);
    write_string(&mut record, 32, "RUST", 8);
    write_string(&mut record, 64, DEFAULT_DATETIME, 16);
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_header_validates() {
        assert!(validate_library_header(&build_library_header()).is_ok());
    }

    #[test]
    fn v8_header_is_rejected() {
        let record = build_fixed_header(V8_LIBRARY_PREFIX);
        let error = validate_library_header(&record).unwrap_err();
        assert!(matches!(error, XptError::InvalidFormat { .. }));
    }
}
