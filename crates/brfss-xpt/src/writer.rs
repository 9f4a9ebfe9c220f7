//! XPT file writer.
//!
//! Writes a single-member V5 transport file from a frame of numeric and
//! string columns. Numeric nulls and NaN become the standard `.` missing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use polars::prelude::{DataFrame, DataType, Float64Chunked, StringChunked};

use crate::error::{Result, XptError};
use crate::float::{ieee_to_ibm, missing_bytes};
use crate::header::{
    NAMESTR_LEN, RECORD_LEN, align_to_record, build_dscrptr_header, build_library_header,
    build_member_data, build_member_header, build_member_second, build_namestr,
    build_namestr_header, build_obs_header, build_real_header,
};
use crate::types::{XptColumn, XptType};

pub struct XptWriter<W: Write> {
    writer: W,
}

impl<W: Write> XptWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write `data` as member `name`.
    pub fn write_frame(mut self, name: &str, data: &DataFrame) -> Result<W> {
        let columns = describe_columns(data)?;

        self.writer.write_all(&build_library_header())?;
        let real = build_real_header();
        self.writer.write_all(&real)?;
        self.writer.write_all(&second_header(&real))?;
        self.writer.write_all(&build_member_header(NAMESTR_LEN))?;
        self.writer.write_all(&build_dscrptr_header())?;
        self.writer.write_all(&build_member_data(name))?;
        self.writer.write_all(&build_member_second(""))?;
        self.writer.write_all(&build_namestr_header(columns.len()))?;

        let mut namestr_block = Vec::with_capacity(align_to_record(columns.len() * NAMESTR_LEN));
        let mut position = 0u32;
        for (idx, column) in columns.iter().enumerate() {
            namestr_block.extend_from_slice(&build_namestr(column, idx as u16 + 1, position));
            position += u32::from(column.length);
        }
        namestr_block.resize(align_to_record(namestr_block.len()), b' ');
        self.writer.write_all(&namestr_block)?;
        self.writer.write_all(&build_obs_header())?;

        let cells = columns
            .iter()
            .map(|column| CellSource::new(data, column))
            .collect::<Result<Vec<_>>>()?;
        let mut written = 0usize;
        let mut row = Vec::with_capacity(position as usize);
        for idx in 0..data.height() {
            row.clear();
            for cell in &cells {
                cell.encode(idx, &mut row)?;
            }
            self.writer.write_all(&row)?;
            written += row.len();
        }
        let padding = align_to_record(written) - written;
        self.writer.write_all(&vec![b' '; padding])?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Write `data` to `path` as a transport file.
pub fn write_xpt(path: &Path, name: &str, data: &DataFrame) -> Result<()> {
    let file = File::create(path)?;
    XptWriter::new(BufWriter::new(file)).write_frame(name, data)?;
    Ok(())
}

fn second_header(real: &[u8; RECORD_LEN]) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    record[..16].copy_from_slice(&real[64..80]);
    record
}

fn describe_columns(data: &DataFrame) -> Result<Vec<XptColumn>> {
    let mut columns = Vec::with_capacity(data.width());
    for column in data.get_columns() {
        let name = column.name().to_string();
        let described = match column.dtype() {
            dtype if dtype.is_primitive_numeric() => XptColumn::numeric(name),
            DataType::String => {
                let longest = column
                    .str()?
                    .into_iter()
                    .flatten()
                    .map(str::len)
                    .max()
                    .unwrap_or(1)
                    .clamp(1, 200);
                XptColumn::character(name, longest as u16)
            }
            other => {
                return Err(XptError::UnsupportedColumn {
                    name,
                    dtype: other.to_string(),
                });
            }
        };
        columns.push(described);
    }
    Ok(columns)
}

enum CellSource {
    Num(Float64Chunked),
    Char(StringChunked, usize),
}

impl CellSource {
    fn new(data: &DataFrame, column: &XptColumn) -> Result<Self> {
        let source = data.column(&column.name)?;
        Ok(match column.data_type {
            XptType::Num => Self::Num(source.cast(&DataType::Float64)?.f64()?.clone()),
            XptType::Char => Self::Char(source.str()?.clone(), usize::from(column.length)),
        })
    }

    fn encode(&self, idx: usize, row: &mut Vec<u8>) -> Result<()> {
        match self {
            Self::Num(values) => {
                let bytes = match values.get(idx) {
                    Some(value) => ieee_to_ibm(value)?,
                    None => missing_bytes(),
                };
                row.extend_from_slice(&bytes);
            }
            Self::Char(values, len) => {
                let text = values.get(idx).unwrap_or("");
                let start = row.len();
                row.extend(text.bytes().take(*len));
                row.resize(start + len, b' ');
            }
        }
        Ok(())
    }
}
