//! XPT file reader.
//!
//! Streams observations straight into Polars column buffers so that only the
//! projected variables of a large survey file are ever materialised.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use tracing::debug;

use crate::error::{Result, XptError};
use crate::float::{ibm_to_ieee, is_missing};
use crate::header::{
    RECORD_LEN, align_to_record, parse_dataset_name, parse_namestr_len, parse_namestr_records,
    parse_variable_count, validate_dscrptr_header, validate_library_header,
    validate_member_header, validate_namestr_header, validate_obs_header,
};
use crate::types::{XptColumn, XptReadOptions, XptType};

/// A decoded transport member.
#[derive(Debug)]
pub struct XptFrame {
    /// Member (dataset) name.
    pub name: String,
    /// Every variable declared in the file, selected or not.
    pub columns: Vec<XptColumn>,
    /// Selected variables; numerics as `Float64` with SAS missing as null.
    pub data: DataFrame,
}

/// XPT V5 reader.
pub struct XptReader<R: Read> {
    reader: BufReader<R>,
    options: XptReadOptions,
}

impl<R: Read> XptReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, XptReadOptions::default())
    }

    pub fn with_options(reader: R, options: XptReadOptions) -> Self {
        Self {
            reader: BufReader::new(reader),
            options,
        }
    }

    /// Read the first member of the file.
    pub fn read_frame(mut self) -> Result<XptFrame> {
        let library = self.read_record()?;
        validate_library_header(&library)?;
        // Real header and modified header carry nothing we use.
        self.read_record()?;
        self.read_record()?;

        let member = self.read_record()?;
        validate_member_header(&member)?;
        let namestr_len = parse_namestr_len(&member)?;
        if namestr_len < 88 {
            return Err(XptError::invalid_format(format!(
                "NAMESTR length {namestr_len} is too small"
            )));
        }

        validate_dscrptr_header(&self.read_record()?)?;
        let name = parse_dataset_name(&self.read_record()?)?;
        self.read_record()?;

        let namestr_header = self.read_record()?;
        validate_namestr_header(&namestr_header)?;
        let var_count = parse_variable_count(&namestr_header)?;

        let namestr_total = var_count
            .checked_mul(namestr_len)
            .ok_or(XptError::ObservationOverflow)?;
        let mut namestr_block = vec![0u8; align_to_record(namestr_total)];
        self.read_exact_or_format(&mut namestr_block, "NAMESTR records")?;
        let columns = parse_namestr_records(&namestr_block, var_count, namestr_len)?;

        validate_obs_header(&self.read_record()?)?;

        let data = self.read_observations(&columns)?;
        debug!(
            member = %name,
            variables = columns.len(),
            selected = data.width(),
            rows = data.height(),
            "decoded transport member"
        );
        Ok(XptFrame {
            name,
            columns,
            data,
        })
    }

    fn read_observations(&mut self, columns: &[XptColumn]) -> Result<DataFrame> {
        let mut slots = Vec::new();
        let mut offset = 0usize;
        for column in columns {
            let len = usize::from(column.length);
            if self.options.wants(&column.name) {
                slots.push(ColumnSlot::new(column, offset));
            }
            offset = offset
                .checked_add(len)
                .ok_or(XptError::ObservationOverflow)?;
        }
        let obs_len = offset;

        if obs_len > 0 {
            let mut row = vec![0u8; obs_len];
            let mut pending_blank = 0usize;
            loop {
                let filled = fill_buffer(&mut self.reader, &mut row)?;
                if filled == 0 {
                    break;
                }
                if filled < obs_len {
                    if row[..filled].iter().any(|&b| b != b' ') {
                        return Err(XptError::TrailingBytes);
                    }
                    break;
                }
                // All-space rows are record padding unless real data follows.
                if row.iter().all(|&b| b == b' ') {
                    pending_blank += 1;
                    continue;
                }
                if pending_blank > 0 {
                    let blank = vec![b' '; obs_len];
                    for _ in 0..pending_blank {
                        decode_row(&blank, &mut slots);
                    }
                    pending_blank = 0;
                }
                decode_row(&row, &mut slots);
            }
        }

        let frame_columns: Vec<Column> = slots.into_iter().map(ColumnSlot::finish).collect();
        Ok(DataFrame::new(frame_columns)?)
    }

    fn read_record(&mut self) -> Result<[u8; RECORD_LEN]> {
        let mut record = [0u8; RECORD_LEN];
        self.read_exact_or_format(&mut record, "header record")?;
        Ok(record)
    }

    fn read_exact_or_format(&mut self, buf: &mut [u8], what: &str) -> Result<()> {
        self.reader.read_exact(buf).map_err(|error| {
            if error.kind() == io::ErrorKind::UnexpectedEof {
                XptError::invalid_format(format!("file ends inside {what}"))
            } else {
                XptError::Io(error)
            }
        })
    }
}

impl XptReader<File> {
    pub fn open(path: &Path, options: XptReadOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                XptError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                XptError::Io(e)
            }
        })?;
        Ok(Self::with_options(file, options))
    }
}

/// Read the first member of an XPT file.
pub fn read_xpt(path: &Path, options: XptReadOptions) -> Result<XptFrame> {
    XptReader::open(path, options)?.read_frame()
}

enum ColumnValues {
    Num(Vec<Option<f64>>),
    Char(Vec<String>),
}

struct ColumnSlot {
    name: String,
    offset: usize,
    len: usize,
    values: ColumnValues,
}

impl ColumnSlot {
    fn new(column: &XptColumn, offset: usize) -> Self {
        let values = match column.data_type {
            XptType::Num => ColumnValues::Num(Vec::new()),
            XptType::Char => ColumnValues::Char(Vec::new()),
        };
        Self {
            name: column.name.clone(),
            offset,
            len: usize::from(column.length),
            values,
        }
    }

    fn finish(self) -> Column {
        match self.values {
            ColumnValues::Num(values) => Series::new(self.name.into(), values).into(),
            ColumnValues::Char(values) => Series::new(self.name.into(), values).into(),
        }
    }
}

fn decode_row(row: &[u8], slots: &mut [ColumnSlot]) {
    for slot in slots {
        let bytes = &row[slot.offset..slot.offset + slot.len];
        match &mut slot.values {
            ColumnValues::Num(values) => values.push(decode_numeric(bytes)),
            ColumnValues::Char(values) => values.push(decode_char(bytes)),
        }
    }
}

fn decode_char(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end().to_string()
}

/// Decode a (possibly truncated) IBM numeric; SAS missing becomes `None`.
fn decode_numeric(bytes: &[u8]) -> Option<f64> {
    if is_missing(bytes) {
        return None;
    }
    let mut buf = [0u8; 8];
    let len = bytes.len().min(8);
    buf[..len].copy_from_slice(&bytes[..len]);
    Some(ibm_to_ieee(buf))
}

/// Fill `buf` from the reader, returning fewer bytes only at end of input.
fn fill_buffer<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(XptError::Io(error)),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_char_trims_padding() {
        assert_eq!(decode_char(b"LLCP    "), "LLCP");
        assert_eq!(decode_char(b""), "");
    }

    #[test]
    fn decode_numeric_missing() {
        assert_eq!(decode_numeric(&[0x2e, 0, 0, 0, 0, 0, 0, 0]), None);
        assert_eq!(decode_numeric(&[b'Z', 0, 0, 0, 0, 0, 0, 0]), None);
    }

    #[test]
    fn decode_numeric_truncated_length() {
        // 1.0 stored in a 3-byte numeric.
        assert_eq!(decode_numeric(&[0x41, 0x10, 0x00]), Some(1.0));
    }
}
