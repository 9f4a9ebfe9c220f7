//! Survey release sources.
//!
//! A [`YearSource`] turns a survey year into a decoded raw table, or reports
//! that no release exists for that year. Two sources are provided:
//! [`DirectorySource`] for releases already on disk and [`ArchiveSource`]
//! for the published zip archives.

pub mod archive;
pub mod error;
pub mod source;
pub mod year;

pub use archive::{ArchiveSource, YEAR_PLACEHOLDER, archive_url, extract_transport};
pub use error::{IngestError, Result};
pub use source::{DirectorySource, RawSurvey, YearSource};
pub use year::parse_survey_year;
