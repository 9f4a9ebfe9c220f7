//! Survey year embedded in release artifact names.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Release artifacts are named `LLCP<year>...` (`LLCP2015.XPT`, `LLCP2021XPT.zip`).
static SURVEY_YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)LLCP(\d{4})").expect("Invalid survey year regex"));

/// Parse the survey year out of an artifact identity (file name or path).
///
/// Only the final path component is inspected.
pub fn parse_survey_year(identity: &str) -> Option<i32> {
    let name = Path::new(identity.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(identity)
        .trim();
    SURVEY_YEAR_REGEX
        .captures(name)
        .and_then(|captures| captures.get(1))
        .and_then(|year| year.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_names() {
        assert_eq!(parse_survey_year("LLCP2015.XPT"), Some(2015));
        assert_eq!(parse_survey_year("LLCP2021.XPT "), Some(2021));
        assert_eq!(parse_survey_year("llcp2019.xpt"), Some(2019));
        assert_eq!(parse_survey_year("data/raw/LLCP2022XPT.zip"), Some(2022));
    }

    #[test]
    fn rejects_other_names() {
        assert_eq!(parse_survey_year("CDBRFS10.XPT"), None);
        assert_eq!(parse_survey_year("LLCP15.XPT"), None);
        assert_eq!(parse_survey_year("LLCP2015/other.xpt"), None);
    }
}
