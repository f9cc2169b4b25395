use super::*;
use crate::error::SweeperError;

fn abc_table() -> Result<Table> {
    Ok(Table::new(df!(
        "A" => &[1, 2],
        "B" => &["x", "y"],
        "C" => &[true, false]
    )?))
}

#[test]
fn test_selection_order_is_output_order() -> Result<()> {
    let projected = project(&abc_table()?, &ColumnSelection::new(["B", "A"]))?;

    assert_eq!(projected.column_names(), vec!["B", "A"]);
    assert_eq!(projected.row_count(), 2);
    assert_eq!(projected.row(1)?, vec![Cell::Text("y".to_owned()), Cell::Integer(2)]);
    Ok(())
}

#[test]
fn test_empty_selection_keeps_row_count() -> Result<()> {
    let projected = project(&abc_table()?, &ColumnSelection::default())?;
    assert_eq!(projected.column_count(), 0);
    assert_eq!(projected.row_count(), 2);
    Ok(())
}

#[test]
fn test_unknown_column_is_rejected() {
    let err = project(&abc_table().unwrap(), &ColumnSelection::new(["A", "Z"])).unwrap_err();
    assert!(matches!(&err, SweeperError::ColumnNotFound(name) if name == "Z"));
    assert_eq!(err.to_string(), "Column not found: 'Z'");
}

#[test]
fn test_repeated_names_are_selected_once() -> Result<()> {
    let selection = ColumnSelection::new(["C", "A", "C"]);
    assert_eq!(selection.names(), ["C".to_owned(), "A".to_owned()]);

    let projected = project(&abc_table()?, &selection)?;
    assert_eq!(projected.column_names(), vec!["C", "A"]);
    Ok(())
}

#[test]
fn test_select_all_is_identity() -> Result<()> {
    let table = abc_table()?;
    let projected = project(&table, &ColumnSelection::all(&table))?;
    assert!(projected.frame().equals_missing(table.frame()));
    Ok(())
}
