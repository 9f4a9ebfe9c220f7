//! Row-level helpers over numeric survey frames.

use std::collections::HashSet;

use polars::prelude::{
    BooleanChunked, Column, DataFrame, DataType, NamedFrom, NewChunkedArray, Series,
};

use crate::error::{Result, TransformError};

/// Values of a numeric column as `f64`, nulls preserved.
pub fn column_options(table: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = table
        .column(name)
        .map_err(|_| TransformError::ColumnNotFound {
            column: name.to_string(),
        })?
        .cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

/// Values of a numeric column as `f64`; nulls and NaN are an error.
pub fn column_values(table: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let options = column_options(table, name)?;
    let missing = options
        .iter()
        .filter(|value| value.is_none_or(f64::is_nan))
        .count();
    if missing > 0 {
        return Err(TransformError::MissingValues {
            column: name.to_string(),
            count: missing,
        });
    }
    Ok(options.into_iter().flatten().collect())
}

/// Replace (or add) a `Float64` column.
pub fn replace_f64(table: &mut DataFrame, name: &str, values: Vec<f64>) -> Result<()> {
    table.with_column(Series::new(name.into(), values))?;
    Ok(())
}

/// Keep the rows whose mask entry is `true`.
pub fn filter_rows(table: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(table.filter(&mask)?)
}

/// Hashable identity of a numeric cell: nulls and NaN compare equal to
/// themselves, and `-0.0` equals `0.0`.
pub(crate) fn cell_key(value: Option<f64>) -> u64 {
    match value {
        None => u64::MAX,
        Some(v) if v.is_nan() => u64::MAX - 1,
        Some(v) if v == 0.0 => 0,
        Some(v) => v.to_bits(),
    }
}

/// Mask keeping the first occurrence of every distinct row.
pub fn first_occurrence_mask(table: &DataFrame) -> Result<Vec<bool>> {
    let columns: Vec<Vec<Option<f64>>> = table
        .get_column_names()
        .into_iter()
        .map(|name| column_options(table, name.as_str()))
        .collect::<Result<_>>()?;

    let mut seen: HashSet<Vec<u64>> = HashSet::with_capacity(table.height());
    let mut keep = Vec::with_capacity(table.height());
    for row in 0..table.height() {
        let key: Vec<u64> = columns.iter().map(|column| cell_key(column[row])).collect();
        keep.push(seen.insert(key));
    }
    Ok(keep)
}

/// Drop exact-duplicate rows, keeping the first occurrence.
///
/// Returns the deduplicated table and the number of rows removed.
pub fn drop_duplicate_rows(table: &DataFrame) -> Result<(DataFrame, usize)> {
    let keep = first_occurrence_mask(table)?;
    let removed = keep.iter().filter(|kept| !**kept).count();
    if removed == 0 {
        return Ok((table.clone(), 0));
    }
    Ok((filter_rows(table, &keep)?, removed))
}

/// Build an `Int64` column from whole-number values.
pub(crate) fn int_column(name: &str, values: &[f64]) -> Column {
    let ints: Vec<i64> = values.iter().map(|v| *v as i64).collect();
    Series::new(name.into(), ints).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("A".into(), vec![Some(1.0), Some(1.0), None, None, Some(0.0)]).into(),
            Series::new("B".into(), vec![2.0, 2.0, 3.0, 3.0, -0.0]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn duplicates_keep_first_and_treat_nulls_as_equal() {
        let (deduped, removed) = drop_duplicate_rows(&frame()).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(deduped.height(), 3);
    }

    #[test]
    fn column_values_rejects_nulls() {
        let error = column_values(&frame(), "A").unwrap_err();
        assert!(matches!(error, TransformError::MissingValues { count: 2, .. }));
        assert_eq!(column_values(&frame(), "B").unwrap().len(), 5);
    }

    #[test]
    fn unknown_column_is_reported() {
        assert!(matches!(
            column_options(&frame(), "C"),
            Err(TransformError::ColumnNotFound { .. })
        ));
    }
}
