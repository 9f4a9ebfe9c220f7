use std::collections::BTreeMap;

use brfss_map::map_columns;
use brfss_model::{Feature, FeatureMap};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};

fn column(name: &str, values: &[f64]) -> Column {
    Series::new(name.into(), values.to_vec()).into()
}

/// A 2015-style release: every feature present under its first alias.
fn release_2015() -> Vec<Column> {
    vec![
        column("_STATE", &[1.0, 2.0]),
        column("_AGEG5YR", &[5.0, 9.0]),
        column("DIABETE3", &[1.0, 3.0]),
        column("_RFHYPE5", &[1.0, 2.0]),
        column("TOLDHI2", &[1.0, 2.0]),
        column("_BMI5", &[2512.0, 3175.0]),
        column("SMOKE100", &[1.0, 2.0]),
        column("_TOTINDA", &[1.0, 2.0]),
        column("_FRTLT1", &[1.0, 2.0]),
        column("_VEGLT1", &[1.0, 2.0]),
        column("DIFFWALK", &[2.0, 2.0]),
        column("SEX", &[1.0, 2.0]),
    ]
}

#[test]
fn complete_release_maps_to_canonical_order() {
    let raw = DataFrame::new(release_2015()).unwrap();
    let map = FeatureMap::embedded().unwrap();

    let mapped = map_columns(&raw, &map).unwrap();
    assert!(mapped.is_complete());
    let table = mapped.table.expect("complete table");

    let names: Vec<String> = table
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, Feature::column_names());
    let bmi = table.column("BMI").unwrap().f64().unwrap();
    assert_eq!(bmi.get(1), Some(3175.0));
}

#[test]
fn first_alias_wins_when_several_are_present() {
    let mut columns = release_2015();
    columns.push(column("DIABETE4", &[4.0, 4.0]));
    let raw = DataFrame::new(columns).unwrap();
    let map = FeatureMap::embedded().unwrap();

    let mapped = map_columns(&raw, &map).unwrap();
    let target = mapped
        .matches
        .iter()
        .find(|m| m.feature == Feature::Diabetes01)
        .unwrap();
    assert_eq!(target.source, "DIABETE3");
    let table = mapped.table.unwrap();
    let values = table.column("Diabetes_01").unwrap().f64().unwrap();
    assert_eq!(values.get(0), Some(1.0));
}

#[test]
fn later_alias_is_used_when_earlier_ones_are_absent() {
    let columns: Vec<Column> = release_2015()
        .into_iter()
        .map(|c| {
            if c.name().as_str() == "SEX" {
                column("SEXVAR", &[2.0, 1.0])
            } else {
                c
            }
        })
        .collect();
    let raw = DataFrame::new(columns).unwrap();
    let map = FeatureMap::embedded().unwrap();

    let mapped = map_columns(&raw, &map).unwrap();
    let sex = mapped.matches.iter().find(|m| m.feature == Feature::Sex).unwrap();
    assert_eq!(sex.source, "SEXVAR");
    assert!(!sex.case_folded);
}

#[test]
fn missing_feature_rejects_the_year() {
    let columns: Vec<Column> = release_2015()
        .into_iter()
        .filter(|c| c.name().as_str() != "SMOKE100")
        .collect();
    let raw = DataFrame::new(columns).unwrap();
    let map = FeatureMap::embedded().unwrap();

    let mapped = map_columns(&raw, &map).unwrap();
    assert!(mapped.table.is_none());
    assert_eq!(mapped.missing_names(), vec!["Smoker"]);
}

#[test]
fn case_insensitive_fallback() {
    let columns: Vec<Column> = release_2015()
        .into_iter()
        .map(|c| {
            if c.name().as_str() == "_BMI5" {
                column("_bmi5", &[2000.0, 2100.0])
            } else {
                c
            }
        })
        .collect();
    let raw = DataFrame::new(columns).unwrap();
    let map = FeatureMap::embedded().unwrap();

    let mapped = map_columns(&raw, &map).unwrap();
    let bmi = mapped.matches.iter().find(|m| m.feature == Feature::Bmi).unwrap();
    assert_eq!(bmi.source, "_bmi5");
    assert!(bmi.case_folded);
}

#[test]
fn higher_priority_alias_wins_even_in_other_case() {
    let columns: Vec<Column> = release_2015()
        .into_iter()
        .map(|c| {
            if c.name().as_str() == "DIABETE3" {
                column("diabete3", &[1.0, 3.0])
            } else {
                c
            }
        })
        .chain([column("DIABETE4", &[4.0, 4.0])])
        .collect();
    let raw = DataFrame::new(columns).unwrap();
    let map = FeatureMap::embedded().unwrap();

    let mapped = map_columns(&raw, &map).unwrap();
    let target = mapped
        .matches
        .iter()
        .find(|m| m.feature == Feature::Diabetes01)
        .unwrap();
    assert_eq!(target.source, "diabete3");
    assert!(target.case_folded);
    let table = mapped.table.unwrap();
    let values = table.column("Diabetes_01").unwrap().f64().unwrap();
    assert_eq!(values.get(1), Some(3.0));
}

#[test]
fn overridden_map_is_honoured() {
    let columns: Vec<Column> = release_2015()
        .into_iter()
        .map(|c| {
            if c.name().as_str() == "SMOKE100" {
                column("SMOKER3", &[1.0, 1.0])
            } else {
                c
            }
        })
        .collect();
    let raw = DataFrame::new(columns).unwrap();
    let mut overrides = BTreeMap::new();
    overrides.insert("Smoker".to_string(), vec!["SMOKER3".to_string()]);
    let map = FeatureMap::embedded()
        .unwrap()
        .with_overrides(&overrides)
        .unwrap();

    let mapped = map_columns(&raw, &map).unwrap();
    assert!(mapped.is_complete());
}
