use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use data_sweeper::config::Settings;
use data_sweeper::pipeline::{
    self, ChartKind, ChartRequest, CleaningOptions, ColumnSelection, ConversionRequest,
    FileFormat, NO_NUMERIC_COLUMNS, PipelineRequest, TabularPipeline,
};
use data_sweeper::utils::fmt_kb;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "data-sweeper",
    about = "Transform files between CSV and Excel formats with built-in data cleaning and visualization"
)]
pub struct Cli {
    /// CSV or Excel (.xlsx) file to process
    pub file: PathBuf,

    /// Your name, for the greeting
    #[arg(long)]
    pub name: Option<String>,

    /// Drop duplicate rows and fill missing numeric values with column means
    #[arg(long)]
    pub clean: bool,

    /// Columns to keep, comma separated, in output order. Defaults to all columns.
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Chart to build for a numeric column; printed as JSON
    #[arg(long, value_enum)]
    pub chart: Option<ChartArg>,

    /// Column to chart. Defaults to the first numeric column.
    #[arg(long)]
    pub chart_column: Option<String>,

    /// Convert to this format and write the result to --output-dir
    #[arg(long, value_enum)]
    pub to: Option<FormatArg>,

    /// Where converted files are written
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Rows shown in the preview
    #[arg(long)]
    pub preview_rows: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ChartArg {
    Bar,
    Line,
    Histogram,
}

impl From<ChartArg> for ChartKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Bar => Self::Bar,
            ChartArg::Line => Self::Line,
            ChartArg::Histogram => Self::Histogram,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Csv,
    #[value(alias = "excel")]
    Xlsx,
}

impl From<FormatArg> for FileFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Self::Csv,
            FormatArg::Xlsx => Self::Spreadsheet,
        }
    }
}

impl Cli {
    fn pipeline_request(&self) -> PipelineRequest {
        PipelineRequest {
            cleaning: CleaningOptions {
                enabled: self.clean,
            },
            columns: self
                .columns
                .as_ref()
                .map(|cols| ColumnSelection::new(cols.iter().map(|c| c.trim()))),
        }
    }
}

/// Runs one file through the pipeline, printing what the web page would show.
pub fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    if let Some(greeting) = cli.name.as_deref().and_then(pipeline::greeting) {
        println!("{greeting}");
    }

    let file_name = cli
        .file
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", cli.file.display()))?
        .to_string_lossy()
        .to_string();
    let bytes = std::fs::read(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;

    let upload = TabularPipeline::ingest(&file_name, &bytes, settings)?;
    drop(bytes);

    match cli.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => println!("Uploaded Files by {name}"),
        _ => println!("Uploaded Files"),
    }
    println!("File Name: {}", upload.source().name);
    println!("File Size: {}", fmt_kb(upload.source().size_bytes));
    println!("Preview:");
    println!("{}", upload.preview(settings.preview_rows)?);

    let prepared = upload.apply(&cli.pipeline_request())?;
    if prepared.is_cleaned() {
        println!("Data cleaned successfully!");
    }

    if let Some(kind) = cli.chart {
        print_chart(&prepared, kind.into(), cli.chart_column.as_deref())?;
    }

    if let Some(target) = cli.to {
        let artifact = prepared.convert(&ConversionRequest::to(target.into()))?;
        let path = artifact.write_to(&cli.output_dir)?;
        println!(
            "Saved {} ({}, {})",
            path.display(),
            artifact.mime_type,
            fmt_kb(artifact.bytes.len() as u64)
        );
    }

    Ok(())
}

fn print_chart(prepared: &TabularPipeline, kind: ChartKind, column: Option<&str>) -> Result<()> {
    let numeric = prepared.numeric_columns();
    let Some(first) = numeric.first() else {
        println!("{NO_NUMERIC_COLUMNS}");
        return Ok(());
    };

    let column = column.unwrap_or(first.as_str());
    let chart = prepared.chart(&ChartRequest::new(kind, column))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&chart).context("Failed to serialize chart")?
    );
    Ok(())
}
