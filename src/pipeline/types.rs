use crate::error::{Result, SweeperError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

// SOURCE FILE

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Csv,
    Spreadsheet,
}

impl FileFormat {
    /// Picks the parser from the file extension. Only `.csv` and `.xlsx` are
    /// accepted, case-insensitively.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Spreadsheet),
            "" => Err(SweeperError::Parse(format!(
                "File '{name}' has no extension; expected .csv or .xlsx"
            ))),
            _ => Err(SweeperError::Parse(format!(
                "Unsupported file extension: {ext}"
            ))),
        }
    }

    /// Extension appended to converted file names.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Spreadsheet => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Spreadsheet => "Excel",
        }
    }
}

/// The uploaded file, as it was received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub name: String,
    pub size_bytes: u64,
    pub format: FileFormat,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, size_bytes: u64, format: FileFormat) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            format,
        }
    }

    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

// CELLS AND COLUMNS

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Text,
    Boolean,
    Temporal,
    /// Every value is missing, so there is nothing to infer a type from.
    Empty,
}

impl ColumnKind {
    pub fn of(column: &Column) -> Self {
        if column.dtype() == &DataType::Null
            || (column.len() > 0 && column.null_count() == column.len())
        {
            return Self::Empty;
        }
        Self::from_dtype(column.dtype())
    }

    pub fn from_dtype(dtype: &DataType) -> Self {
        if dtype.is_primitive_numeric() {
            Self::Numeric
        } else if dtype.is_bool() {
            Self::Boolean
        } else if dtype.is_temporal() {
            Self::Temporal
        } else if dtype == &DataType::Null {
            Self::Empty
        } else {
            Self::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Text => "Text",
            Self::Boolean => "Boolean",
            Self::Temporal => "Temporal",
            Self::Empty => "Empty",
        }
    }
}

/// One table value, tagged by type.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Missing,
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Text(String),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<AnyValue<'_>> for Cell {
    fn from(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Self::Missing,
            AnyValue::Boolean(v) => Self::Boolean(v),
            AnyValue::String(v) => Self::Text(v.to_owned()),
            AnyValue::StringOwned(v) => Self::Text(v.to_string()),
            AnyValue::Int8(v) => Self::Integer(i64::from(v)),
            AnyValue::Int16(v) => Self::Integer(i64::from(v)),
            AnyValue::Int32(v) => Self::Integer(i64::from(v)),
            AnyValue::Int64(v) => Self::Integer(v),
            AnyValue::UInt8(v) => Self::Integer(i64::from(v)),
            AnyValue::UInt16(v) => Self::Integer(i64::from(v)),
            AnyValue::UInt32(v) => Self::Integer(i64::from(v)),
            AnyValue::UInt64(v) => i64::try_from(v).map_or(Self::Number(v as f64), Self::Integer),
            AnyValue::Float32(v) => Self::Number(f64::from(v)),
            AnyValue::Float64(v) => Self::Number(v),
            other => Self::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "—"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

// TABLE

/// An in-memory table: ordered, named, equal-length columns.
///
/// The row count is stored alongside the frame because a frame with no
/// columns has no height of its own, and projecting onto zero columns must
/// keep the number of rows.
#[derive(Clone, Debug)]
pub struct Table {
    frame: DataFrame,
    row_count: usize,
}

impl Table {
    pub fn new(frame: DataFrame) -> Self {
        let row_count = frame.height();
        Self { frame, row_count }
    }

    /// A table with no columns and `row_count` rows.
    pub fn without_columns(row_count: usize) -> Self {
        Self {
            frame: DataFrame::empty(),
            row_count,
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.frame.width()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.frame
            .get_columns()
            .iter()
            .find(|c| c.name().as_str() == name)
            .ok_or_else(|| SweeperError::ColumnNotFound(name.to_owned()))
    }

    pub fn column_kind(&self, name: &str) -> Result<ColumnKind> {
        self.column(name).map(ColumnKind::of)
    }

    pub fn column_kinds(&self) -> Vec<(String, ColumnKind)> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| (c.name().to_string(), ColumnKind::of(c)))
            .collect()
    }

    /// Names of the columns that can be charted, in table order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.column_kinds()
            .into_iter()
            .filter(|(_, kind)| *kind == ColumnKind::Numeric)
            .map(|(name, _)| name)
            .collect()
    }

    /// All cells of one row, in column order.
    pub fn row(&self, index: usize) -> Result<Vec<Cell>> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| Ok(Cell::from(c.as_materialized_series().get(index)?)))
            .collect()
    }

    pub fn rows(&self) -> Result<Vec<Vec<Cell>>> {
        (0..self.frame.height()).map(|i| self.row(i)).collect()
    }

    /// First `limit` rows plus column metadata, for display.
    pub fn head(&self, limit: usize) -> Result<Preview> {
        let columns = self
            .column_kinds()
            .into_iter()
            .map(|(name, kind)| PreviewColumn { name, kind })
            .collect();
        let shown = limit.min(self.frame.height());
        let rows = (0..shown).map(|i| self.row(i)).collect::<Result<_>>()?;

        Ok(Preview {
            columns,
            rows,
            total_rows: self.row_count,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PreviewColumn {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Preview {
    pub columns: Vec<PreviewColumn>,
    pub rows: Vec<Vec<Cell>>,
    pub total_rows: usize,
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                rendered
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|s| s.chars().count())
                    .chain(std::iter::once(col.name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<w$}", col.name))
            .collect();
        writeln!(f, "{}", header.join(" | ").trim_end())?;

        for row in &rendered {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{cell:<w$}"))
                .collect();
            writeln!(f, "{}", line.join(" | ").trim_end())?;
        }

        write!(
            f,
            "({} of {} rows, {} columns)",
            self.rows.len(),
            self.total_rows,
            self.columns.len()
        )
    }
}

// REQUESTS

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningOptions {
    pub enabled: bool,
}

/// Ordered set of column names. Repeated names keep their first position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelection(Vec<String>);

impl ColumnSelection {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .collect();
        Self(names)
    }

    /// Every column of `table`, in table order.
    pub fn all(table: &Table) -> Self {
        Self(table.column_names())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What the presentation layer asked for, before charting or converting.
/// `columns: None` keeps every column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub cleaning: CleaningOptions,
    pub columns: Option<ColumnSelection>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Histogram,
}

impl ChartKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Bar => "Bar Chart",
            Self::Line => "Line Chart",
            Self::Histogram => "Histogram",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub column: String,
}

impl ChartRequest {
    pub fn new(kind: ChartKind, column: impl Into<String>) -> Self {
        Self {
            kind,
            column: column.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub target_format: FileFormat,
}

impl ConversionRequest {
    pub fn to(target_format: FileFormat) -> Self {
        Self { target_format }
    }
}

/// Serialized table ready for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
}
