//! Schema mapping from yearly survey variables to canonical features.

pub mod error;
pub mod lookup;
pub mod mapper;

pub use error::{MapError, Result};
pub use lookup::CaseInsensitiveSet;
pub use mapper::{ColumnMatch, MappedTable, map_columns};
