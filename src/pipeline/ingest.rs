//! Ingest: uploaded bytes to a [`Table`].
//!
//! CSV goes through the polars reader, which infers one dtype per column
//! from the first `infer_schema_length` rows and rescans the whole file when a
//! later row disagrees. Fields spelled like [`NULL_TOKENS`] are missing, the
//! same as empty fields. Workbooks go through calamine;
//! only the first sheet is read and column types are inferred here from the
//! cell variants, integral floats folding into integers the way spreadsheet
//! numbers are usually meant.

use super::types::{Cell, FileFormat, SourceFile, Table};
use crate::config::Settings;
use crate::error::{Result, SweeperError};
use calamine::{Data, Reader as _, Xlsx};
use polars::prelude::*;
use std::io::Cursor;

const EMPTY_INPUT: &str = "No columns to parse from file";

/// Parses an upload. The format comes from `name`'s extension.
///
/// # Errors
///
/// [`SweeperError::Parse`] for unsupported extensions, empty input, and
/// bytes the chosen parser rejects.
pub fn ingest(name: &str, bytes: &[u8], settings: &Settings) -> Result<(SourceFile, Table)> {
    let format = FileFormat::from_file_name(name)?;
    let source = SourceFile::new(name, bytes.len() as u64, format);

    tracing::info!(
        "Ingesting {name} ({:.2} KB) as {}",
        source.size_kb(),
        format.as_str()
    );

    let table = match format {
        FileFormat::Csv => read_csv(bytes, settings.infer_schema_length)?,
        FileFormat::Spreadsheet => read_spreadsheet(bytes)?,
    };

    tracing::info!(
        "Loaded {name}: {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok((source, table))
}

/// Field values read as missing in every CSV column, besides the empty field.
/// The usual spellings spreadsheet and dataframe tools write for a gap.
pub const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Reads CSV bytes. Column types are inferred from the first
/// `infer_schema_length` rows; if a later row does not fit the inferred type,
/// the whole file is scanned again and the types are inferred from every row.
pub fn read_csv(bytes: &[u8], infer_schema_length: usize) -> Result<Table> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(SweeperError::Parse(EMPTY_INPUT.to_owned()));
    }

    let frame = match csv_frame(bytes, Some(infer_schema_length)) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::debug!(
                "CSV read with {infer_schema_length} inference rows failed ({err}), rescanning all rows"
            );
            csv_frame(bytes, None)
                .map_err(|e| SweeperError::Parse(format!("Failed to read CSV: {e}")))?
        }
    };

    Ok(Table::new(frame))
}

fn csv_frame(bytes: &[u8], infer_schema_length: Option<usize>) -> PolarsResult<DataFrame> {
    let null_values = NullValues::AllColumns(NULL_TOKENS.iter().map(|t| (*t).into()).collect());

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .map_parse_options(|opts| opts.with_null_values(Some(null_values.clone())))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

pub fn read_spreadsheet(bytes: &[u8]) -> Result<Table> {
    if bytes.is_empty() {
        return Err(SweeperError::Parse(EMPTY_INPUT.to_owned()));
    }

    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| SweeperError::Parse(format!("Failed to open workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SweeperError::Parse("Workbook contains no sheets".to_owned()))?
        .map_err(|e| SweeperError::Parse(format!("Failed to read first sheet: {e}")))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| SweeperError::Parse(EMPTY_INPUT.to_owned()))?;

    let names = dedupe_names(
        header
            .iter()
            .enumerate()
            .map(|(i, cell)| header_name(i, cell))
            .collect(),
    );

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(row.get(i).map_or(Cell::Missing, cell_from_data));
        }
    }

    let columns = names
        .iter()
        .zip(&cells)
        .map(|(name, values)| column_from_cells(name, values))
        .collect();

    let frame = DataFrame::new(columns)
        .map_err(|e| SweeperError::Parse(format!("Failed to build table from sheet: {e}")))?;
    Ok(Table::new(frame))
}

fn header_name(index: usize, cell: &Data) -> String {
    let name = match cell {
        Data::Empty => String::new(),
        other => cell_from_data(other).to_string(),
    };
    if name.trim().is_empty() {
        format!("Unnamed: {index}")
    } else {
        name
    }
}

/// Repeated header names get a `.1`, `.2`, ... suffix so every column stays
/// addressable.
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let mut candidate = name.clone();
            let mut n = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{name}.{n}");
                n += 1;
            }
            candidate
        })
        .collect()
}

pub(crate) fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Missing,
        Data::Int(v) => Cell::Integer(*v),
        Data::Float(v) => Cell::Number(*v),
        Data::Bool(v) => Cell::Boolean(*v),
        Data::String(v) if v.is_empty() => Cell::Missing,
        Data::String(v) => Cell::Text(v.clone()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Cell::Text(d.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or_else(|| Cell::Number(dt.as_f64())),
        other => Cell::Text(other.to_string()),
    }
}

/// Builds one typed column from spreadsheet cells.
///
/// All integers, or floats with no fractional part, give an `Int64` column;
/// any real fraction gives `Float64`; all booleans give `Boolean`; anything
/// else is text. A column with no values at all becomes an all-null
/// `Float64` column.
pub(crate) fn column_from_cells(name: &str, cells: &[Cell]) -> Column {
    let present = || cells.iter().filter(|c| !c.is_missing());
    let name: PlSmallStr = name.into();

    let series = if present().next().is_none() {
        Series::new(name, vec![None::<f64>; cells.len()])
    } else if present().all(|c| is_integral(c)) {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Integer(v) => Some(*v),
                Cell::Number(v) => Some(*v as i64),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else if present().all(|c| matches!(c, Cell::Integer(_) | Cell::Number(_))) {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Integer(v) => Some(*v as f64),
                Cell::Number(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else if present().all(|c| matches!(c, Cell::Boolean(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Cell::Boolean(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| (!c.is_missing()).then(|| c.to_string()))
            .collect();
        Series::new(name, values)
    };

    Column::from(series)
}

fn is_integral(cell: &Cell) -> bool {
    match cell {
        Cell::Integer(_) => true,
        Cell::Number(v) => v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15,
        _ => false,
    }
}
