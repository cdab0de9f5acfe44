use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::models::sheet::WRITE_COLUMNS;
use crate::models::{Cell, SheetRow};

/// Lay out a received record as a sheet row: the write columns in header
/// order, then the submission timestamp. Missing fields become empty text;
/// unknown keys are dropped.
pub fn to_cells(record: &Map<String, Value>, submitted_at: DateTime<Utc>) -> Vec<Cell> {
    let mut cells: Vec<Cell> = WRITE_COLUMNS
        .iter()
        .map(|column| record.get(*column).map(Cell::from).unwrap_or_else(|| Cell::text("")))
        .collect();
    cells.push(Cell::Date(submitted_at));
    cells
}

/// Names of keys that are not sheet columns.
pub fn unknown_keys(record: &Map<String, Value>) -> Vec<&str> {
    record
        .keys()
        .map(String::as_str)
        .filter(|k| !WRITE_COLUMNS.contains(k))
        .collect()
}

/// Rendered text view of the write columns, for rule checks.
pub fn as_sheet_row(cells: &[Cell]) -> SheetRow {
    let text = |i: usize| cells.get(i).map(Cell::render).unwrap_or_default();
    SheetRow {
        store_name: text(0),
        merchant_name: text(1),
        phone_number: text(2),
        address: text(3),
        pincode: text(4),
        location: text(5),
        merchant_response: text(6),
        potential_problems: text(7),
    }
}
