use super::types::{ColumnSelection, Table};
use crate::error::Result;

/// Restricts `table` to the selected columns, in selection order.
///
/// An empty selection gives a table with no columns and the same row count.
///
/// # Errors
///
/// [`crate::error::SweeperError::ColumnNotFound`] for the first selected name
/// the table does not have.
pub fn project(table: &Table, selection: &ColumnSelection) -> Result<Table> {
    if selection.is_empty() {
        tracing::debug!("Empty column selection, keeping {} rows", table.row_count());
        return Ok(Table::without_columns(table.row_count()));
    }

    let columns = selection
        .names()
        .iter()
        .map(|name| table.column(name).cloned())
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("Selected columns: {}", selection.names().join(", "));
    let frame = polars::prelude::DataFrame::new(columns)?;
    Ok(Table::new(frame))
}
