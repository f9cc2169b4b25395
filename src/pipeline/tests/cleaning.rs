use super::*;
use crate::pipeline::cleaning::{drop_duplicate_rows, fill_missing_with_mean};
use crate::pipeline::ingest::read_csv;

fn floats(table: &Table, name: &str) -> Result<Vec<Option<f64>>> {
    let series = table
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

#[test]
fn test_duplicates_keep_first_occurrence() -> Result<()> {
    let table = Table::new(df!(
        "letter" => &["A", "B", "A", "C", "B"],
        "n" => &[1, 2, 1, 3, 2]
    )?);

    let cleaned = clean(table)?;
    assert_eq!(cleaned.row_count(), 3);
    assert_eq!(
        cleaned.column("letter")?.as_materialized_series().str()?.into_iter().collect::<Vec<_>>(),
        vec![Some("A"), Some("B"), Some("C")]
    );
    Ok(())
}

#[test]
fn test_missing_matches_missing_when_deduplicating() -> Result<()> {
    let table = Table::new(df!(
        "name" => &[Some("x"), None, Some("x"), None],
        "code" => &["a", "b", "a", "b"]
    )?);

    let deduped = drop_duplicate_rows(table)?;
    assert_eq!(deduped.row_count(), 2);
    assert_eq!(deduped.row(1)?[0], Cell::Missing);
    Ok(())
}

#[test]
fn test_missing_numbers_take_column_mean() -> Result<()> {
    let table = Table::new(df!("value" => &[Some(1), None, Some(3)])?);

    let cleaned = clean(table)?;
    assert_eq!(floats(&cleaned, "value")?, vec![Some(1.0), Some(2.0), Some(3.0)]);
    assert_eq!(cleaned.column("value")?.dtype(), &DataType::Float64);
    Ok(())
}

#[test]
fn test_nan_cells_are_filled_and_left_out_of_the_mean() -> Result<()> {
    let table = Table::new(df!(
        "k" => &["a", "b", "c", "d"],
        "v" => &[Some(1.0), Some(f64::NAN), None, Some(3.0)]
    )?);

    let (imputed, filled) = fill_missing_with_mean(table)?;
    assert_eq!(filled, 2);
    assert_eq!(
        floats(&imputed, "v")?,
        vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0)]
    );
    Ok(())
}

#[test]
fn test_nan_only_column_is_not_filled_with_nan() -> Result<()> {
    let table = Table::new(df!(
        "id" => &[1, 2],
        "v" => &[Some(f64::NAN), None]
    )?);

    let (imputed, filled) = fill_missing_with_mean(table)?;
    assert_eq!(filled, 0);
    assert_eq!(imputed.column("v")?.null_count(), 1);
    Ok(())
}

#[test]
fn test_csv_null_spelling_is_imputed() -> Result<()> {
    let cleaned = clean(read_csv(b"v\n1\nNA\n3\n", 100)?)?;
    assert_eq!(floats(&cleaned, "v")?, vec![Some(1.0), Some(2.0), Some(3.0)]);
    Ok(())
}

#[test]
fn test_complete_numeric_column_keeps_dtype() -> Result<()> {
    let table = Table::new(df!(
        "count" => &[1_i64, 2, 3],
        "score" => &[Some(1.5), None, Some(2.5)]
    )?);

    let (imputed, filled) = fill_missing_with_mean(table)?;
    assert_eq!(filled, 1);
    assert_eq!(imputed.column("count")?.dtype(), &DataType::Int64);
    Ok(())
}

#[test]
fn test_all_missing_numeric_column_is_left_alone() -> Result<()> {
    let table = Table::new(df!(
        "id" => &[1, 2],
        "blank" => &[None::<f64>, None]
    )?);

    let (imputed, filled) = fill_missing_with_mean(table)?;
    assert_eq!(filled, 0);
    assert_eq!(imputed.column("blank")?.null_count(), 2);
    Ok(())
}

#[test]
fn test_text_gaps_are_not_filled() -> Result<()> {
    let table = Table::new(df!(
        "city" => &[Some("Oslo"), None, Some("Lima")],
        "pop" => &[1.0, 2.0, 3.0]
    )?);

    let cleaned = clean(table)?;
    assert_eq!(cleaned.row(1)?[0], Cell::Missing);
    Ok(())
}

#[test]
fn test_mean_is_taken_after_deduplication() -> Result<()> {
    // With the duplicate 10 still present the mean would be 20, not 25.
    let table = Table::new(df!(
        "id" => &[1, 1, 2, 3],
        "value" => &[Some(10.0), Some(10.0), None, Some(40.0)]
    )?);

    let cleaned = clean(table)?;
    assert_eq!(cleaned.row_count(), 3);
    assert_eq!(floats(&cleaned, "value")?, vec![Some(10.0), Some(25.0), Some(40.0)]);
    Ok(())
}

#[test]
fn test_rows_made_equal_by_filling_are_collapsed() -> Result<()> {
    // The mean of 1, 2, 3 is 2, so the filled second row duplicates the third.
    let table = Table::new(df!(
        "key" => &["a", "a", "a", "a"],
        "value" => &[Some(1.0), None, Some(2.0), Some(3.0)]
    )?);

    let cleaned = clean(table)?;
    assert_eq!(cleaned.row_count(), 3);
    assert_eq!(floats(&cleaned, "value")?, vec![Some(1.0), Some(2.0), Some(3.0)]);
    Ok(())
}

#[test]
fn test_clean_is_idempotent() -> Result<()> {
    let once = clean(sales_table()?)?;
    let twice = clean(once.clone())?;

    assert_eq!(once.row_count(), twice.row_count());
    assert!(once.frame().equals_missing(twice.frame()));
    Ok(())
}

#[test]
fn test_empty_tables_pass_through() -> Result<()> {
    let no_rows = Table::new(df!("a" => Vec::<i64>::new())?);
    assert_eq!(clean(no_rows)?.row_count(), 0);

    let no_columns = Table::without_columns(4);
    let cleaned = clean(no_columns)?;
    assert_eq!(cleaned.row_count(), 4);
    assert_eq!(cleaned.column_count(), 0);
    Ok(())
}
