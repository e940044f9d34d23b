use std::io::Cursor;

use calamine::{Data, Reader};

use crate::error::FreteError;
use crate::extraction::{RawTable, TableExtractor};
use crate::model::Cell;

/// Reads the first sheet of a spreadsheet workbook (xlsx, xls, xlsb, ods).
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookExtractor;

impl TableExtractor for WorkbookExtractor {
    fn extract_table(&self, bytes: &[u8]) -> Result<RawTable, FreteError> {
        let cursor = Cursor::new(bytes);
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| FreteError::Workbook(format!("failed to open workbook: {e}")))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| FreteError::Workbook("workbook has no sheets".into()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| FreteError::Workbook(format!("sheet '{sheet_name}': {e}")))?;

        let rows: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();

        tracing::debug!(sheet = %sheet_name, rows = rows.len(), "read workbook sheet");

        RawTable::from_rows(rows)
    }

    fn backend_name(&self) -> &str {
        "workbook"
    }
}

/// Convert a calamine cell. Date cells keep their serial day number.
fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from_text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_text(s),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}
