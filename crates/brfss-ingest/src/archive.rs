//! Yearly release archives fetched over HTTP.
//!
//! Releases are published as zip archives holding one transport file. An
//! archive is downloaded only when the raw directory has no unpacked copy for
//! the year; the extracted `.xpt` is kept there for later runs.

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::source::{DirectorySource, RawSurvey, YearSource};

/// Placeholder substituted with the survey year in URL templates.
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// HTTP request timeout; yearly archives run to hundreds of megabytes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(900);

/// Suffix of an extract in progress; never matched as a cached release.
const PARTIAL_SUFFIX: &str = ".part";

const USER_AGENT_VALUE: &str = concat!("brfss-pipeline/", env!("CARGO_PKG_VERSION"));

/// Downloads `url_template` with the year substituted, caching into `raw_dir`.
pub struct ArchiveSource {
    url_template: String,
    cache: DirectorySource,
    client: Client,
}

impl ArchiveSource {
    pub fn new(url_template: impl Into<String>, cache: DirectorySource) -> Result<Self> {
        let url_template = url_template.into();
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|source| IngestError::Request {
                url: url_template.clone(),
                source,
            })?;
        Ok(Self {
            url_template,
            cache,
            client,
        })
    }

    pub fn url_for(&self, year: i32) -> String {
        archive_url(&self.url_template, year)
    }

    /// Download the archive for `year`; `None` when the server reports 404.
    fn download(&self, year: i32) -> Result<Option<Vec<u8>>> {
        let url = self.url_for(year);
        info!(year, %url, "downloading release archive");
        let start = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| IngestError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!(year, %url, "no release published");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IngestError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|source| IngestError::Request {
            url: url.clone(),
            source,
        })?;
        info!(
            year,
            bytes = bytes.len(),
            duration_ms = start.elapsed().as_millis(),
            "download complete"
        );
        Ok(Some(bytes.to_vec()))
    }
}

impl YearSource for ArchiveSource {
    fn fetch(&self, year: i32) -> Result<Option<RawSurvey>> {
        if let Some(path) = self.cache.locate(year)? {
            debug!(year, path = %path.display(), "using cached release");
            return self.cache.read(&path).map(Some);
        }
        let Some(archive) = self.download(year)? else {
            return Ok(None);
        };
        let url = self.url_for(year);
        let path = extract_transport(&archive, self.cache.raw_dir(), &url)?;
        self.cache.read(&path).map(Some)
    }
}

/// Substitute every `{year}` placeholder.
pub fn archive_url(template: &str, year: i32) -> String {
    template.replace(YEAR_PLACEHOLDER, &year.to_string())
}

/// Extract the first `.xpt` member of `archive` into `dest_dir`.
///
/// Release archives pad member names with trailing spaces; the extracted file
/// takes the trimmed base name. The member is written under a `.part` name
/// and renamed once complete, so an interrupted extract is never picked up
/// as a release. `url` is only used for error context.
pub fn extract_transport(archive: &[u8], dest_dir: &Path, url: &str) -> Result<PathBuf> {
    let archive_error = |message: String| IngestError::Archive {
        url: url.to_string(),
        message,
    };
    let mut zip =
        zip::ZipArchive::new(Cursor::new(archive)).map_err(|e| archive_error(e.to_string()))?;

    for index in 0..zip.len() {
        let mut member = zip
            .by_index(index)
            .map_err(|e| archive_error(e.to_string()))?;
        if member.is_dir() {
            continue;
        }
        let Some(file_name) = Path::new(member.name())
            .file_name()
            .map(|name| name.to_string_lossy().trim().to_string())
        else {
            continue;
        };
        if !file_name.to_ascii_lowercase().ends_with(".xpt") {
            debug!(member = %file_name, "skipping non-transport archive member");
            continue;
        }

        fs::create_dir_all(dest_dir).map_err(|source| IngestError::FileWrite {
            path: dest_dir.to_path_buf(),
            source,
        })?;
        let dest_path = dest_dir.join(&file_name);
        let temp_path = dest_dir.join(format!("{file_name}{PARTIAL_SUFFIX}"));
        let written = File::create(&temp_path)
            .and_then(|mut out| {
                io::copy(&mut member, &mut out)?;
                out.sync_all()
            })
            .and_then(|()| fs::rename(&temp_path, &dest_path));
        if let Err(source) = written {
            if let Err(error) = fs::remove_file(&temp_path) {
                warn!(path = %temp_path.display(), %error, "could not remove partial extract");
            }
            return Err(IngestError::FileWrite {
                path: dest_path,
                source,
            });
        }
        info!(path = %dest_path.display(), "extracted transport file");
        return Ok(dest_path);
    }

    Err(IngestError::NoTransportMember {
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_substitution() {
        assert_eq!(
            archive_url("https://host/{year}/files/LLCP{year}XPT.zip", 2016),
            "https://host/2016/files/LLCP2016XPT.zip"
        );
    }
}
