//! Member header record handling.
//!
//! # Structure
//!
//! 1. Member header: `HEADER RECORD*******MEMBER  HEADER RECORD!!!!!!!...`
//! 2. DSCRPTR header: `HEADER RECORD*******DSCRPTR HEADER RECORD!!!!!!!...`
//! 3. Member data (80 bytes): Dataset name, version, etc.
//! 4. Member second (80 bytes): Modified datetime, label, type
//! 5. NAMESTR header: `HEADER RECORD*******NAMESTR HEADER RECORD!!!!!!!...`
//! 6. NAMESTR records: Variable definitions
//! 7. OBS header: `HEADER RECORD*******OBS     HEADER RECORD!!!!!!!...`
//! 8. Observation data

use crate::error::{Result, XptError};

use super::library::RECORD_LEN;
use super::{DEFAULT_DATETIME, build_fixed_header, read_string, write_string};

pub const MEMBER_HEADER_PREFIX: &str = "HEADER RECORD*******MEMBER  HEADER RECORD!!!!!!!";
pub const DSCRPTR_HEADER_PREFIX: &str = "HEADER RECORD*******DSCRPTR HEADER RECORD!!!!!!!";
pub const NAMESTR_HEADER_PREFIX: &str = "HEADER RECORD*******NAMESTR HEADER RECORD!!!!!!!";
pub const OBS_HEADER_PREFIX: &str = "HEADER RECORD*******OBS     HEADER RECORD!!!!!!!";

fn validate_prefix(record: &[u8], prefix: &str, expected: &'static str) -> Result<()> {
    if record.len() < RECORD_LEN {
        return Err(XptError::invalid_format(format!("{expected} too short")));
    }
    if !record.starts_with(prefix.as_bytes()) {
        return Err(XptError::missing_header(expected));
    }
    Ok(())
}

pub fn validate_member_header(record: &[u8]) -> Result<()> {
    validate_prefix(record, MEMBER_HEADER_PREFIX, "MEMBER HEADER")
}

pub fn validate_dscrptr_header(record: &[u8]) -> Result<()> {
    validate_prefix(record, DSCRPTR_HEADER_PREFIX, "DSCRPTR HEADER")
}

pub fn validate_namestr_header(record: &[u8]) -> Result<()> {
    validate_prefix(record, NAMESTR_HEADER_PREFIX, "NAMESTR HEADER")
}

pub fn validate_obs_header(record: &[u8]) -> Result<()> {
    validate_prefix(record, OBS_HEADER_PREFIX, "OBS HEADER")
}

/// Parse NAMESTR length from member header record.
///
/// The NAMESTR length is at offset 74-77 (4 ASCII digits): 140, or 136 on VAX/VMS.
pub fn parse_namestr_len(record: &[u8]) -> Result<usize> {
    parse_digits(record, 74, "NAMESTR length")
}

/// Parse variable count from NAMESTR header record (offset 54-57).
pub fn parse_variable_count(record: &[u8]) -> Result<usize> {
    parse_digits(record, 54, "variable count")
}

fn parse_digits(record: &[u8], offset: usize, field: &str) -> Result<usize> {
    read_string(record, offset, 4)
        .trim()
        .parse::<usize>()
        .map_err(|_| XptError::NumericParse {
            field: field.to_string(),
        })
}

/// Parse dataset name from member data record (offset 8-15).
pub fn parse_dataset_name(record: &[u8]) -> Result<String> {
    let name = read_string(record, 8, 8);
    if name.is_empty() {
        return Err(XptError::invalid_format("empty dataset name"));
    }
    Ok(name)
}

#[must_use]
pub fn build_member_header(namestr_len: usize) -> [u8; RECORD_LEN] {
    let mut record = build_fixed_header(MEMBER_HEADER_PREFIX);
    write_string(&mut record, 64, "0160", 4);
    write_string(&mut record, 74, &format!("{namestr_len:04}"), 4);
    record
}

#[must_use]
pub fn build_dscrptr_header() -> [u8; RECORD_LEN] {
    build_fixed_header(DSCRPTR_HEADER_PREFIX)
}

#[must_use]
pub fn build_member_data(name: &str) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    write_string(&mut record, 0, "SAS", 8);
    write_string(&mut record, 8, name, 8);
    write_string(&mut record, 16, "SASDATA", 8);
    write_string(&mut record, 24, "9.4", 8);
    write_string(&mut record, 32, "RUST", 8);
    write_string(&mut record, 64, DEFAULT_DATETIME, 16);
    record
}

#[must_use]
pub fn build_member_second(label: &str) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    write_string(&mut record, 0, DEFAULT_DATETIME, 16);
    write_string(&mut record, 32, label, 40);
    record
}

#[must_use]
pub fn build_namestr_header(var_count: usize) -> [u8; RECORD_LEN] {
    let mut record = build_fixed_header(NAMESTR_HEADER_PREFIX);
    write_string(&mut record, 54, &format!("{var_count:04}"), 4);
    record
}

#[must_use]
pub fn build_obs_header() -> [u8; RECORD_LEN] {
    build_fixed_header(OBS_HEADER_PREFIX)
}

/// Align a size to the next record boundary (80 bytes).
#[must_use]
pub fn align_to_record(size: usize) -> usize {
    size.div_ceil(RECORD_LEN) * RECORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_header_carries_namestr_len() {
        let record = build_member_header(140);
        assert!(validate_member_header(&record).is_ok());
        assert_eq!(parse_namestr_len(&record).unwrap(), 140);
    }

    #[test]
    fn namestr_header_carries_count() {
        let record = build_namestr_header(312);
        assert_eq!(parse_variable_count(&record).unwrap(), 312);
    }

    #[test]
    fn wrong_prefix_is_missing_header() {
        let record = build_obs_header();
        assert!(matches!(
            validate_member_header(&record),
            Err(XptError::MissingHeader { .. })
        ));
    }

    #[test]
    fn alignment() {
        assert_eq!(align_to_record(0), 0);
        assert_eq!(align_to_record(140), 160);
        assert_eq!(align_to_record(160), 160);
    }
}
