#![expect(clippy::unwrap_used, clippy::indexing_slicing)]
use super::*;
use anyhow::Result;
use polars::prelude::*;

mod cleaning;
mod projection;

fn sales_table() -> Result<Table> {
    let df = df!(
        "region" => &["north", "south", "north", "east", "south"],
        "amount" => &[Some(10.0), None, Some(10.0), Some(40.0), None],
        "units" => &[1, 2, 1, 4, 2]
    )?;
    Ok(Table::new(df))
}

fn csv_source(name: &str) -> SourceFile {
    SourceFile::new(name, 0, FileFormat::Csv)
}

#[test]
fn test_apply_cleans_then_projects() -> Result<()> {
    let upload = TabularPipeline::from_parts(csv_source("sales.csv"), sales_table()?);

    let prepared = upload.apply(&PipelineRequest {
        cleaning: CleaningOptions { enabled: true },
        columns: Some(ColumnSelection::new(["amount", "region"])),
    })?;

    assert!(prepared.is_cleaned());
    assert_eq!(prepared.table().column_names(), vec!["amount", "region"]);
    // Rows 0/2 and 1/4 are duplicates; the remaining amounts are 10, null, 40.
    assert_eq!(prepared.table().row_count(), 3);
    let amounts = prepared.table().column("amount")?.as_materialized_series().f64()?.clone();
    assert_eq!(amounts.get(1), Some(25.0));

    // The original upload is untouched.
    assert_eq!(upload.table().row_count(), 5);
    assert!(!upload.is_cleaned());
    Ok(())
}

#[test]
fn test_apply_default_request_is_identity() -> Result<()> {
    let upload = TabularPipeline::from_parts(csv_source("sales.csv"), sales_table()?);
    let prepared = upload.apply(&PipelineRequest::default())?;

    assert!(!prepared.is_cleaned());
    assert!(prepared.table().frame().equals_missing(upload.table().frame()));
    Ok(())
}

#[test]
fn test_apply_unknown_column_fails() -> Result<()> {
    let upload = TabularPipeline::from_parts(csv_source("sales.csv"), sales_table()?);
    let err = upload
        .apply(&PipelineRequest {
            cleaning: CleaningOptions::default(),
            columns: Some(ColumnSelection::new(["Z"])),
        })
        .unwrap_err();
    assert!(matches!(err, crate::error::SweeperError::ColumnNotFound(name) if name == "Z"));
    Ok(())
}

#[test]
fn test_preview_limits_rows() -> Result<()> {
    let upload = TabularPipeline::from_parts(csv_source("sales.csv"), sales_table()?);
    let preview = upload.preview(2)?;

    assert_eq!(preview.rows.len(), 2);
    assert_eq!(preview.total_rows, 5);
    assert_eq!(preview.columns[1].name, "amount");
    assert_eq!(preview.columns[1].kind, ColumnKind::Numeric);
    assert_eq!(preview.rows[0][0], Cell::Text("north".to_owned()));
    assert_eq!(preview.rows[1][1], Cell::Missing);
    assert_eq!(preview.rows[0][2], Cell::Integer(1));

    let rendered = preview.to_string();
    assert!(rendered.starts_with("region | amount | units"));
    assert!(rendered.ends_with("(2 of 5 rows, 3 columns)"));
    Ok(())
}

#[test]
fn test_greeting() {
    assert_eq!(greeting("Ada"), Some("Welcome, Ada!".to_owned()));
    assert_eq!(greeting("  Ada "), Some("Welcome, Ada!".to_owned()));
    assert_eq!(greeting("   "), None);
}

#[test]
fn test_column_kind_from_dtype() {
    for dtype in [DataType::Int32, DataType::Int64, DataType::UInt8, DataType::Float64] {
        assert_eq!(ColumnKind::from_dtype(&dtype), ColumnKind::Numeric, "{dtype}");
    }
    assert_eq!(ColumnKind::from_dtype(&DataType::Boolean), ColumnKind::Boolean);
    assert_eq!(ColumnKind::from_dtype(&DataType::String), ColumnKind::Text);
    assert_eq!(ColumnKind::from_dtype(&DataType::Null), ColumnKind::Empty);
}
