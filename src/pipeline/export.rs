//! Export: a [`Table`] to downloadable CSV or XLSX bytes.

use super::types::{Cell, ConversionRequest, ExportArtifact, FileFormat, SourceFile, Table};
use crate::error::{Result, SweeperError};
use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// Largest sheet Excel can open.
pub const MAX_SHEET_ROWS: usize = 1_048_576;
pub const MAX_SHEET_COLUMNS: usize = 16_384;

const SHEET_NAME: &str = "Sheet1";

/// Serializes `table` for download as `request.target_format`.
///
/// # Errors
///
/// [`SweeperError::Export`] if the writer fails or the table does not fit in
/// a worksheet.
pub fn export(
    table: &Table,
    source: &SourceFile,
    request: &ConversionRequest,
) -> Result<ExportArtifact> {
    let format = request.target_format;
    let bytes = match format {
        FileFormat::Csv => write_csv(table)?,
        FileFormat::Spreadsheet => write_xlsx(table)?,
    };
    let filename = converted_file_name(&source.name, format);

    tracing::info!(
        "Converted {} to {} ({} bytes): {filename}",
        source.name,
        format.as_str(),
        bytes.len()
    );
    Ok(ExportArtifact {
        bytes,
        filename,
        mime_type: format.mime_type(),
    })
}

/// `converted_<original name>.<ext>`. The original extension stays in place.
pub fn converted_file_name(original_name: &str, format: FileFormat) -> String {
    format!("converted_{original_name}.{}", format.extension())
}

pub fn write_csv(table: &Table) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut frame = table.frame().clone();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut frame)
        .map_err(|e| SweeperError::Export(format!("Failed to write CSV: {e}")))?;
    Ok(buffer)
}

pub fn write_xlsx(table: &Table) -> Result<Vec<u8>> {
    // One header row on top of the data.
    if table.row_count() + 1 > MAX_SHEET_ROWS {
        return Err(SweeperError::Export(format!(
            "{} rows do not fit in a worksheet (limit {})",
            table.row_count(),
            MAX_SHEET_ROWS - 1
        )));
    }
    if table.column_count() > MAX_SHEET_COLUMNS {
        return Err(SweeperError::Export(format!(
            "{} columns do not fit in a worksheet (limit {MAX_SHEET_COLUMNS})",
            table.column_count()
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(xlsx_error)?;

    for (col, name) in table.column_names().iter().enumerate() {
        worksheet
            .write_string(0, col_index(col)?, name.as_str())
            .map_err(xlsx_error)?;
    }

    for (row_idx, row) in table.rows()?.into_iter().enumerate() {
        let row_num = row_index(row_idx + 1)?;
        for (col, cell) in row.into_iter().enumerate() {
            let col_num = col_index(col)?;
            match cell {
                Cell::Missing => {}
                Cell::Integer(v) => {
                    worksheet
                        .write_number(row_num, col_num, v as f64)
                        .map_err(xlsx_error)?;
                }
                // Excel has no NaN or infinity; leave the cell blank.
                Cell::Number(v) if !v.is_finite() => {}
                Cell::Number(v) => {
                    worksheet
                        .write_number(row_num, col_num, v)
                        .map_err(xlsx_error)?;
                }
                Cell::Boolean(v) => {
                    worksheet
                        .write_boolean(row_num, col_num, v)
                        .map_err(xlsx_error)?;
                }
                Cell::Text(v) => {
                    worksheet
                        .write_string(row_num, col_num, v)
                        .map_err(xlsx_error)?;
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

impl ExportArtifact {
    /// Writes the bytes to `dir/<filename>` and returns the path.
    ///
    /// # Errors
    ///
    /// [`SweeperError::Export`] if the directory or file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| {
            SweeperError::Export(format!("Failed to create {}: {e}", dir.display()))
        })?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes).map_err(|e| {
            SweeperError::Export(format!("Failed to write {}: {e}", path.display()))
        })?;
        Ok(path)
    }
}

fn xlsx_error(err: rust_xlsxwriter::XlsxError) -> SweeperError {
    SweeperError::Export(format!("Failed to write workbook: {err}"))
}

fn row_index(row: usize) -> Result<u32> {
    u32::try_from(row).map_err(|e| SweeperError::Export(format!("Row {row} is out of range: {e}")))
}

fn col_index(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|e| SweeperError::Export(format!("Column {col} is out of range: {e}")))
}
