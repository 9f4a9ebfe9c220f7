//! Persisted per-year outputs of the diabetes indicator pipeline.

pub mod error;
pub mod longitudinal;
pub mod naming;
pub mod store;

pub use error::{OutputError, Result};
pub use longitudinal::{YEAR_COLUMN, load_longitudinal};
pub use naming::{OUTPUT_PREFIX, output_file_name, parse_output_year};
pub use store::{OutputStore, PersistedYear};
