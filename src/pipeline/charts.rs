//! Visualize: chart descriptions for one numeric column.
//!
//! The output is data only. A renderer draws it; nothing here is written to
//! the export artifact.

use super::types::{ChartKind, ChartRequest, ColumnKind, Table};
use crate::error::{Result, SweeperError};
use polars::prelude::*;
use serde::Serialize;

pub const HISTOGRAM_BINS: usize = 20;

/// Shown instead of a chart when the table has no numeric column.
pub const NO_NUMERIC_COLUMNS: &str = "No numeric columns available for visualization.";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub column: String,
    pub title: String,
    pub series: ChartSeries,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSeries {
    /// Occurrences of each distinct value, in ascending value order.
    Bar { bars: Vec<BarEntry> },
    /// Raw values by row index. Missing values are gaps.
    Line { points: Vec<LinePoint> },
    Histogram {
        bin_width: f64,
        bins: Vec<HistogramBin>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarEntry {
    pub label: String,
    pub value: f64,
    pub count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LinePoint {
    pub x: usize,
    pub y: Option<f64>,
}

/// Half-open `[start, end)`, except the last bin which also holds `end`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Builds the chart for `request`.
///
/// # Errors
///
/// [`SweeperError::ColumnNotFound`] if the column does not exist and
/// [`SweeperError::NonNumericColumn`] if it is not numeric.
pub fn build_chart(table: &Table, request: &ChartRequest) -> Result<ChartSpec> {
    let column = table.column(&request.column)?;
    if ColumnKind::of(column) != ColumnKind::Numeric {
        return Err(SweeperError::NonNumericColumn(request.column.clone()));
    }

    let floats = column.as_materialized_series().cast(&DataType::Float64)?;
    // NaN counts as missing, the same as null.
    let values: Vec<Option<f64>> = floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();

    let series = match request.kind {
        ChartKind::Bar => ChartSeries::Bar {
            bars: value_counts(&values),
        },
        ChartKind::Line => ChartSeries::Line {
            points: values
                .iter()
                .enumerate()
                .map(|(x, y)| LinePoint { x, y: *y })
                .collect(),
        },
        ChartKind::Histogram => {
            let (bin_width, bins) = histogram(&values, HISTOGRAM_BINS);
            ChartSeries::Histogram { bin_width, bins }
        }
    };

    tracing::debug!("Built {} for '{}'", request.kind.label(), request.column);
    Ok(ChartSpec {
        kind: request.kind,
        column: request.column.clone(),
        title: format!("{} of {}", request.kind.label(), request.column),
        series,
    })
}

pub fn value_counts(values: &[Option<f64>]) -> Vec<BarEntry> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(f64::total_cmp);

    let mut bars: Vec<BarEntry> = Vec::new();
    for v in present {
        match bars.last_mut() {
            Some(last) if last.value.total_cmp(&v).is_eq() => last.count += 1,
            _ => bars.push(BarEntry {
                label: v.to_string(),
                value: v,
                count: 1,
            }),
        }
    }
    bars
}

/// Splits the range of the present values into `num_bins` equal-width bins.
///
/// A constant column is centred in `[v - 0.5, v + 0.5]`; a column with no
/// values gets empty bins over `[0, 1]`. Infinite values are skipped.
pub fn histogram(values: &[Option<f64>], num_bins: usize) -> (f64, Vec<HistogramBin>) {
    let finite: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();

    let min = finite.iter().copied().reduce(f64::min);
    let max = finite.iter().copied().reduce(f64::max);
    let (lo, hi) = match (min, max) {
        (Some(lo), Some(hi)) if hi > lo => (lo, hi),
        (Some(v), Some(_)) => (v - 0.5, v + 0.5),
        _ => (0.0, 1.0),
    };

    let num_bins = num_bins.max(1);
    let bin_width = (hi - lo) / num_bins as f64;

    let mut counts = vec![0_usize; num_bins];
    let last = num_bins - 1;
    for v in finite {
        let idx = (((v - lo) / bin_width).floor() as usize).min(last);
        if let Some(count) = counts.get_mut(idx) {
            *count += 1;
        }
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + i as f64 * bin_width,
            end: if i == last {
                hi
            } else {
                lo + (i + 1) as f64 * bin_width
            },
            count,
        })
        .collect();

    (bin_width, bins)
}
