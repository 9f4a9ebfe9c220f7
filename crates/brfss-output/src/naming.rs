//! Output file naming.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

pub const OUTPUT_PREFIX: &str = "diabetes_01_health_indicators_BRFSS";
pub const OUTPUT_EXTENSION: &str = "parquet";

static OUTPUT_YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"BRFSS(\d{4})").expect("Invalid output year regex"));

/// `diabetes_01_health_indicators_BRFSS<year>.parquet`
pub fn output_file_name(year: i32) -> String {
    format!("{OUTPUT_PREFIX}{year}.{OUTPUT_EXTENSION}")
}

/// Year embedded in an output file name; any path prefix is ignored.
pub fn parse_output_year(path: &Path) -> Option<i32> {
    let name = path.file_name()?.to_str()?;
    OUTPUT_YEAR_REGEX
        .captures(name)
        .and_then(|captures| captures.get(1))
        .and_then(|year| year.as_str().parse().ok())
}

/// `true` for files ending in `.parquet`, in any case.
pub fn is_output_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(OUTPUT_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_round_trips_through_parser() {
        let name = output_file_name(2017);
        assert_eq!(name, "diabetes_01_health_indicators_BRFSS2017.parquet");
        assert_eq!(parse_output_year(Path::new(&name)), Some(2017));
    }

    #[test]
    fn parser_ignores_directories() {
        assert_eq!(
            parse_output_year(Path::new("BRFSS1999/notes.parquet")),
            None
        );
        assert_eq!(parse_output_year(Path::new("out/BRFSS2020_extra.parquet")), Some(2020));
    }

    #[test]
    fn only_parquet_files_count() {
        assert!(is_output_file(Path::new("a.parquet")));
        assert!(is_output_file(Path::new("a.PARQUET")));
        assert!(!is_output_file(Path::new("a.parquet.tmp")));
        assert!(!is_output_file(Path::new("a.csv")));
    }
}
