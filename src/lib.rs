//! # Data Sweeper
//!
//! Convert tabular files between CSV and Excel, with optional cleaning,
//! column selection and chart data along the way.
//!
//! ## Quick Start
//!
//! ```no_run
//! use data_sweeper::config::Settings;
//! use data_sweeper::pipeline::{ConversionRequest, FileFormat, TabularPipeline};
//!
//! # fn example() -> anyhow::Result<()> {
//! let bytes = std::fs::read("data.csv")?;
//! let upload = TabularPipeline::ingest("data.csv", &bytes, &Settings::default())?;
//! println!("{}", upload.preview(5)?);
//!
//! let artifact = upload.convert(&ConversionRequest::to(FileFormat::Spreadsheet))?;
//! std::fs::write(&artifact.filename, &artifact.bytes)?; // converted_data.csv.xlsx
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`pipeline`]: the five stages and the [`pipeline::TabularPipeline`] session
//! - [`error`]: [`error::SweeperError`] and the crate `Result` alias
//! - [`config`]: runtime settings from defaults and `SWEEPER_*` variables
//! - [`logging`]: `tracing` subscriber setup for the binary
//! - [`utils`]: small display helpers
//!
//! ## Key Concepts
//!
//! ### Tables are polars frames
//!
//! A [`pipeline::Table`] wraps a polars `DataFrame`. Column types are decided
//! once, at ingest, and read back as a [`pipeline::ColumnKind`] so later stages
//! can match on them instead of poking at dtypes.
//!
//! ### Requests are values
//!
//! Every choice a user makes (clean or not, which columns, which chart, which
//! target format) is an immutable request struct passed into a stage. No
//! stage keeps state between calls.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod utils;
