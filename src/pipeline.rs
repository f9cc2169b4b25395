//! The tabular pipeline: ingest → clean → project → chart → export.
//!
//! Each stage is a plain function over a [`Table`] and can be called on its
//! own. [`TabularPipeline`] strings them together for one uploaded file, the
//! way a presentation layer drives them.
//!
//! # Example
//!
//! ```no_run
//! use data_sweeper::config::Settings;
//! use data_sweeper::pipeline::{
//!     ChartKind, ChartRequest, CleaningOptions, ColumnSelection, ConversionRequest,
//!     FileFormat, PipelineRequest, TabularPipeline,
//! };
//!
//! let bytes = std::fs::read("sales.xlsx")?;
//! let upload = TabularPipeline::ingest("sales.xlsx", &bytes, &Settings::default())?;
//!
//! let prepared = upload.apply(&PipelineRequest {
//!     cleaning: CleaningOptions { enabled: true },
//!     columns: Some(ColumnSelection::new(["region", "amount"])),
//! })?;
//!
//! let chart = prepared.chart(&ChartRequest::new(ChartKind::Histogram, "amount"))?;
//! println!("{}", chart.title);
//!
//! let artifact = prepared.convert(&ConversionRequest::to(FileFormat::Csv))?;
//! assert_eq!(artifact.filename, "converted_sales.xlsx.csv");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Stages
//!
//! | Stage     | Function                     | Fails with                        |
//! |-----------|------------------------------|-----------------------------------|
//! | Ingest    | [`ingest::ingest`]           | `Parse`                           |
//! | Clean     | [`cleaning::clean`]          | never on a well-formed table      |
//! | Project   | [`projection::project`]      | `ColumnNotFound`                  |
//! | Visualize | [`charts::build_chart`]      | `ColumnNotFound`, `NonNumericColumn` |
//! | Export    | [`export::export`]           | `Export`                          |

pub mod charts;
pub mod cleaning;
pub mod export;
pub mod ingest;
pub mod projection;
pub mod types;

pub use charts::{
    BarEntry, ChartSeries, ChartSpec, HISTOGRAM_BINS, HistogramBin, LinePoint, NO_NUMERIC_COLUMNS,
    build_chart,
};
pub use cleaning::clean;
pub use export::{converted_file_name, export};
pub use ingest::ingest;
pub use projection::project;
pub use types::{
    Cell, ChartKind, ChartRequest, CleaningOptions, ColumnKind, ColumnSelection,
    ConversionRequest, ExportArtifact, FileFormat, PipelineRequest, Preview, PreviewColumn,
    SourceFile, Table,
};

use crate::config::Settings;
use crate::error::Result;

/// One uploaded file and the table derived from it so far.
#[derive(Clone, Debug)]
pub struct TabularPipeline {
    source: SourceFile,
    table: Table,
    cleaned: bool,
}

impl TabularPipeline {
    /// Parses the upload. See [`ingest::ingest`].
    pub fn ingest(name: &str, bytes: &[u8], settings: &Settings) -> Result<Self> {
        let (source, table) = ingest::ingest(name, bytes, settings)?;
        Ok(Self {
            source,
            table,
            cleaned: false,
        })
    }

    pub fn from_parts(source: SourceFile, table: Table) -> Self {
        Self {
            source,
            table,
            cleaned: false,
        }
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Whether the clean stage ran to produce this table.
    pub fn is_cleaned(&self) -> bool {
        self.cleaned
    }

    pub fn preview(&self, rows: usize) -> Result<Preview> {
        self.table.head(rows)
    }

    /// Runs the optional clean and project stages, in that order, and returns
    /// the resulting pipeline. `self` is left untouched so the same upload can
    /// be prepared again with different choices.
    pub fn apply(&self, request: &PipelineRequest) -> Result<Self> {
        let mut table = self.table.clone();
        if request.cleaning.enabled {
            table = cleaning::clean(table)?;
        }
        if let Some(selection) = &request.columns {
            table = projection::project(&table, selection)?;
        }

        Ok(Self {
            source: self.source.clone(),
            table,
            cleaned: self.cleaned || request.cleaning.enabled,
        })
    }

    /// Columns a chart can be drawn for. Empty means the caller should show
    /// [`NO_NUMERIC_COLUMNS`] instead of offering a chart.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.table.numeric_columns()
    }

    pub fn chart(&self, request: &ChartRequest) -> Result<ChartSpec> {
        charts::build_chart(&self.table, request)
    }

    pub fn convert(&self, request: &ConversionRequest) -> Result<ExportArtifact> {
        export::export(&self.table, &self.source, request)
    }
}

/// The sidebar greeting. Blank names get none.
pub fn greeting(name: &str) -> Option<String> {
    let name = name.trim();
    (!name.is_empty()).then(|| format!("Welcome, {name}!"))
}

#[cfg(test)]
mod tests;
