//! XPT header record parsing and building.
//!
//! This module handles the header records in a V5 transport file:
//! - Library headers (file-level metadata)
//! - Member headers (dataset-level metadata)
//! - NAMESTR records (variable definitions)
//! - OBS header (marks start of observation data)

pub mod library;
pub mod member;
pub mod namestr;

pub use library::{
    LIBRARY_HEADER_PREFIX, RECORD_LEN, build_library_header, build_real_header,
    validate_library_header,
};
pub use member::{
    align_to_record, build_dscrptr_header, build_member_data, build_member_header,
    build_member_second, build_namestr_header, build_obs_header, parse_dataset_name,
    parse_namestr_len, parse_variable_count, validate_dscrptr_header, validate_member_header,
    validate_namestr_header, validate_obs_header,
};
pub use namestr::{NAMESTR_LEN, build_namestr, parse_namestr_records};

/// Fixed timestamp stamped into written headers.
pub(crate) const DEFAULT_DATETIME: &str = "01JAN70:00:00:00";

/// Read a string from bytes, trimming trailing spaces.
pub(crate) fn read_string(data: &[u8], offset: usize, len: usize) -> String {
    data.get(offset..offset + len)
        .map(|slice| String::from_utf8_lossy(slice).trim_end().to_string())
        .unwrap_or_default()
}

/// Write a string into a space-initialised buffer, truncated to `len`.
pub(crate) fn write_string(buf: &mut [u8], offset: usize, value: &str, len: usize) {
    for (i, ch) in value.chars().take(len).enumerate() {
        buf[offset + i] = if ch.is_ascii() { ch as u8 } else { b'?' };
    }
}

/// Build a header record: 48-byte prefix followed by ASCII zeros.
pub(crate) fn build_fixed_header(prefix: &str) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    let prefix_bytes = prefix.as_bytes();
    let copy_len = prefix_bytes.len().min(48);
    record[..copy_len].copy_from_slice(&prefix_bytes[..copy_len]);
    for byte in &mut record[48..78] {
        *byte = b'0';
    }
    record
}
