//! SAS Transport (XPT) V5 reader and writer over Polars frames.
//!
//! Survey releases ship as single-member V5 transport files with several
//! hundred numeric variables. The reader decodes only the variables named
//! in [`XptReadOptions::columns`], converting IBM floats to `f64` and SAS
//! missing codes (`.`, `._`, `.A`-`.Z`) to nulls.

mod error;
pub mod float;
pub mod header;
mod reader;
mod types;
mod writer;

pub use error::{Result, XptError};
pub use reader::{XptFrame, XptReader, read_xpt};
pub use types::{XptColumn, XptReadOptions, XptType};
pub use writer::{XptWriter, write_xpt};
