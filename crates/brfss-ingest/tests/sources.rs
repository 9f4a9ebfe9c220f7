//! Tests for the directory and archive sources using on-disk fixtures.

use std::io::{Cursor, Write};

use brfss_ingest::{
    ArchiveSource, DirectorySource, IngestError, YearSource, extract_transport, parse_survey_year,
};
use brfss_xpt::write_xpt;
use polars::prelude::{DataFrame, NamedFrom, Series};
use zip::write::SimpleFileOptions;

fn release_frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new("DIABETE3".into(), vec![1.0, 3.0]).into(),
        Series::new("_BMI5".into(), vec![2512.0, 3175.0]).into(),
        Series::new("IYEAR".into(), vec![2015.0, 2015.0]).into(),
    ])
    .unwrap()
}

fn transport_bytes() -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.xpt");
    write_xpt(&path, "LLCP2015", &release_frame()).unwrap();
    std::fs::read(path).unwrap()
}

fn zip_with(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in members {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn directory_source_reads_projected_release() {
    let dir = tempfile::tempdir().unwrap();
    write_xpt(&dir.path().join("LLCP2015.XPT "), "LLCP2015", &release_frame()).unwrap();

    let source = DirectorySource::new(dir.path()).with_projection(["diabete3", "_BMI5"]);
    let survey = source.fetch(2015).unwrap().expect("release present");

    assert_eq!(survey.identity, "LLCP2015.XPT");
    assert_eq!(parse_survey_year(&survey.identity), Some(2015));
    assert_eq!(survey.table.width(), 2);
    assert_eq!(survey.table.height(), 2);
}

#[test]
fn directory_source_reports_absent_year() {
    let dir = tempfile::tempdir().unwrap();
    write_xpt(&dir.path().join("LLCP2015.XPT"), "LLCP2015", &release_frame()).unwrap();

    let source = DirectorySource::new(dir.path());
    assert!(source.fetch(2016).unwrap().is_none());
}

#[test]
fn corrupt_release_is_a_recoverable_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("LLCP2017.XPT"), b"not a transport file").unwrap();

    let error = DirectorySource::new(dir.path()).fetch(2017).unwrap_err();
    assert!(matches!(error, IngestError::Decode { .. }));
    assert!(error.is_recoverable());
}

#[test]
fn extract_picks_transport_member_and_trims_name() {
    let transport = transport_bytes();
    let archive = zip_with(&[
        ("readme.txt", b"codebook elsewhere".as_slice()),
        ("LLCP2015.XPT ", transport.as_slice()),
    ]);
    let dir = tempfile::tempdir().unwrap();

    let path = extract_transport(&archive, dir.path(), "https://example.org/x.zip").unwrap();
    assert_eq!(path, dir.path().join("LLCP2015.XPT"));
    assert_eq!(std::fs::read(&path).unwrap(), transport);
    assert!(!dir.path().join("readme.txt").exists());
}

#[test]
fn extract_leaves_only_the_finished_file() {
    let transport = transport_bytes();
    let archive = zip_with(&[("LLCP2016.XPT", transport.as_slice())]);
    let dir = tempfile::tempdir().unwrap();

    extract_transport(&archive, dir.path(), "u").unwrap();
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["LLCP2016.XPT".to_string()]);
}

#[test]
fn interrupted_extract_is_not_a_cached_release() {
    let transport = transport_bytes();
    let dir = tempfile::tempdir().unwrap();
    // A copy cut short at a record boundary still decodes, so only its
    // name keeps it out of the cache.
    let cut = transport.len() - 80;
    std::fs::write(dir.path().join("LLCP2015.XPT.part"), &transport[..cut]).unwrap();

    let source = DirectorySource::new(dir.path());
    assert!(source.locate(2015).unwrap().is_none());
    assert!(source.fetch(2015).unwrap().is_none());
}

#[test]
fn extract_without_transport_member_fails() {
    let archive = zip_with(&[("readme.txt", b"nothing here".as_slice())]);
    let dir = tempfile::tempdir().unwrap();

    let error = extract_transport(&archive, dir.path(), "u").unwrap_err();
    assert!(matches!(error, IngestError::NoTransportMember { .. }));
    assert!(error.is_recoverable());
}

#[test]
fn extract_rejects_non_zip_payload() {
    let dir = tempfile::tempdir().unwrap();
    let error = extract_transport(b"<html>maintenance</html>", dir.path(), "u").unwrap_err();
    assert!(matches!(error, IngestError::Archive { .. }));
}

#[test]
fn archive_source_prefers_cached_release() {
    let dir = tempfile::tempdir().unwrap();
    write_xpt(&dir.path().join("LLCP2015.XPT"), "LLCP2015", &release_frame()).unwrap();

    // Unroutable template: any download attempt would fail the test.
    let source = ArchiveSource::new(
        "http://127.0.0.1:9/{year}/LLCP{year}XPT.zip",
        DirectorySource::new(dir.path()),
    )
    .unwrap();
    assert_eq!(source.url_for(2015), "http://127.0.0.1:9/2015/LLCP2015XPT.zip");

    let survey = source.fetch(2015).unwrap().expect("cached release");
    assert_eq!(survey.identity, "LLCP2015.XPT");
}
