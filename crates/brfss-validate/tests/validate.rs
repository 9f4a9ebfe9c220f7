//! Schema checks over hand-built processed tables.

use brfss_model::Feature;
use brfss_validate::{Issue, Statistic, validate};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};

/// Standardized values with sample mean 0 and sample std 1.
fn standardized_bmi() -> Vec<f64> {
    // mean 0, sum of squares 3 over n - 1 = 3
    let half = 0.5f64.sqrt();
    vec![-1.0, -half, half, 1.0]
}

fn table_with(bmi: Vec<f64>, high_bp: Vec<i64>, age: Vec<i64>) -> DataFrame {
    let columns: Vec<Column> = Feature::ALL
        .iter()
        .map(|feature| {
            let name = feature.name().into();
            let series = match feature {
                Feature::Bmi => Series::new(name, bmi.clone()),
                Feature::HighBP => Series::new(name, high_bp.clone()),
                Feature::Age => Series::new(name, age.clone()),
                _ => Series::new(name, vec![0i64, 1, 0, 1]),
            };
            Column::from(series)
        })
        .collect();
    DataFrame::new(columns).unwrap()
}

fn valid_table() -> DataFrame {
    table_with(standardized_bmi(), vec![0, 1, 1, 0], vec![1, 5, 9, 13])
}

#[test]
fn clean_table_passes() {
    let report = validate(&valid_table());
    assert!(report.is_empty(), "{:?}", report.issues);
}

#[test]
fn binary_value_outside_set_is_reported_with_row() {
    let report = validate(&table_with(
        standardized_bmi(),
        vec![0, 2, 1, 0],
        vec![1, 5, 9, 13],
    ));
    assert_eq!(report.len(), 1);
    match &report.issues[0] {
        Issue::NotInSet {
            column,
            invalid_count,
            cases,
            ..
        } => {
            assert_eq!(column, "HighBP");
            assert_eq!(*invalid_count, 1);
            assert_eq!(cases[0].row, 1);
            assert_eq!(cases[0].value, 2.0);
        }
        other => panic!("unexpected issue {other:?}"),
    }
}

#[test]
fn negative_age_is_reported() {
    let report = validate(&table_with(
        standardized_bmi(),
        vec![0, 1, 1, 0],
        vec![1, -3, 9, 13],
    ));
    assert!(matches!(
        report.issues.as_slice(),
        [Issue::BelowMinimum { invalid_count: 1, .. }]
    ));
}

#[test]
fn unscaled_bmi_fails_every_distribution_gate() {
    let report = validate(&table_with(
        vec![18.0, 22.5, 27.0, 31.5],
        vec![0, 1, 1, 0],
        vec![1, 5, 9, 13],
    ));
    assert_eq!(report.failed_columns(), vec!["BMI"]);
    let statistics: Vec<Statistic> = report
        .issues
        .iter()
        .filter_map(|issue| match issue {
            Issue::StatisticOutOfRange { statistic, .. } => Some(*statistic),
            _ => None,
        })
        .collect();
    assert_eq!(statistics, vec![Statistic::Mean, Statistic::StdDev]);
    assert!(
        report
            .issues
            .iter()
            .any(|issue| matches!(issue, Issue::OutOfRange { invalid_count: 4, .. }))
    );
}

#[test]
fn single_row_has_no_standard_deviation() {
    let columns: Vec<Column> = Feature::ALL
        .iter()
        .map(|feature| {
            let name = feature.name().into();
            let series = match feature {
                Feature::Bmi => Series::new(name, vec![0.0f64]),
                _ => Series::new(name, vec![1i64]),
            };
            Column::from(series)
        })
        .collect();
    let report = validate(&DataFrame::new(columns).unwrap());
    assert!(report.issues.iter().any(|issue| matches!(
        issue,
        Issue::StatisticOutOfRange { statistic: Statistic::StdDev, value, .. } if value.is_nan()
    )));
}

#[test]
fn missing_and_mistyped_columns() {
    let mut table = valid_table();
    let _ = table.drop_in_place("Smoker").unwrap();
    table
        .with_column(Series::new("Sex".into(), vec![0.0, 1.0, 0.0, 1.0]))
        .unwrap();

    let report = validate(&table);
    assert!(matches!(
        &report.issues[0],
        Issue::ColumnMissing { column } if column == "Smoker"
    ));
    assert!(matches!(
        &report.issues[1],
        Issue::WrongType { column, expected: "int64", .. } if column == "Sex"
    ));
}

#[test]
fn failure_block_lists_cases() {
    let report = validate(&table_with(
        standardized_bmi(),
        vec![0, 2, 1, 0],
        vec![1, 5, 9, 13],
    ));
    let block = report.render_failure_block(2015, "out/BRFSS2015.parquet");
    insta::assert_snapshot!(block.trim_end(), @r"
    [FAILED] BRFSS2015 - out/BRFSS2015.parquet:
    column  check         failure_case  index
    HighBP  isin([0, 1])  2             1
    ");
}
