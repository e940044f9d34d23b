pub mod dates;
pub mod header;
pub mod normalize;
pub mod values;

use serde::Serialize;

use crate::extraction::RawTable;
use crate::model::{field, Cell, Shipment};
use header::{map_headers, HeaderMapping};
use normalize::sanitize;

/// Rows shorter than this are export noise (totals, footers) and skipped.
pub const MIN_ROW_CELLS: usize = 5;

/// Fields that are sanitized in place when a record is built.
const SANITIZED_FIELDS: [&str; 4] = [
    field::CIDADE_ORIGEM,
    field::CIDADE_DESTINO,
    field::REMETENTE,
    field::DESTINATARIO,
];

/// Result of mapping a raw table onto canonical fields.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedTable {
    pub mapping: HeaderMapping,
    pub records: Vec<Shipment>,
    pub skipped_rows: Vec<SkippedRow>,
}

/// A data row that did not become a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based row number in the input, counting the header row.
    pub row_number: usize,
    pub reason: String,
}

/// Map every data row of `table` into a shipment record.
///
/// Rows with fewer than five cells, and rows with neither a CT-e nor a
/// manifest reference, are skipped and reported.
pub fn parse_table(table: &RawTable) -> ParsedTable {
    let mapping = map_headers(&table.headers);
    let mut records = Vec::new();
    let mut skipped_rows = Vec::new();

    for (i, row) in table.rows.iter().enumerate() {
        let row_number = i + 2;

        if row.len() < MIN_ROW_CELLS {
            skipped_rows.push(SkippedRow {
                row_number,
                reason: format!("only {} cell(s)", row.len()),
            });
            continue;
        }

        let record = build_record(&mapping, row);
        if !record.has(field::CTE) && !record.has(field::MANIFESTO) {
            skipped_rows.push(SkippedRow {
                row_number,
                reason: "no CT-e or manifest reference".into(),
            });
            continue;
        }

        records.push(record);
    }

    if !skipped_rows.is_empty() {
        tracing::debug!(skipped = skipped_rows.len(), "rows skipped while mapping");
    }
    tracing::info!(
        records = records.len(),
        columns = mapping.len(),
        "mapped shipment rows"
    );

    ParsedTable {
        mapping,
        records,
        skipped_rows,
    }
}

/// Build one record from a row. When two columns map to the same field the
/// later column wins.
fn build_record(mapping: &HeaderMapping, row: &[Cell]) -> Shipment {
    let mut record = Shipment::default();
    for (index, cell) in row.iter().enumerate() {
        if let Some(name) = mapping.field(index) {
            record.set(name, cell.clone());
        }
    }

    for name in SANITIZED_FIELDS {
        let clean = sanitize(record.get(name));
        record.set(name, Cell::from_text(&clean));
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|s| Cell::from_text(s)).collect()
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: row(headers),
            rows: rows.iter().map(|r| row(r)).collect(),
        }
    }

    const HEADERS: &[&str] = &["CTE", "M D F E", "CIDADE", "CIDADE", "Remetente", "Destinatário"];

    #[test]
    fn records_mapped_and_sanitized() {
        let t = table(
            HEADERS,
            &[&["1001", "", "são paulo", "'Campinas'", "acme ltda", "mercado &amp; cia"]],
        );
        let parsed = parse_table(&t);
        assert_eq!(parsed.records.len(), 1);
        let r = &parsed.records[0];
        assert_eq!(r.cte(), "1001");
        assert_eq!(r.text(field::CIDADE_ORIGEM), "SÃO PAULO");
        assert_eq!(r.text(field::CIDADE_DESTINO), "CAMPINAS");
        assert_eq!(r.text(field::REMETENTE), "ACME LTDA");
        assert_eq!(r.text(field::DESTINATARIO), "MERCADO  CIA");
    }

    #[test]
    fn short_rows_skipped() {
        let t = table(HEADERS, &[&["1001", "", "X", "Y"]]);
        let parsed = parse_table(&t);
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped_rows[0].row_number, 2);
    }

    #[test]
    fn manifest_without_cte_is_kept() {
        let t = table(HEADERS, &[&["", "MF-9", "A", "B", "C", "D"]]);
        let parsed = parse_table(&t);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].text(field::MANIFESTO), "MF-9");
    }

    #[test]
    fn rows_without_identifier_skipped() {
        let t = table(HEADERS, &[&["", "", "A", "B", "C", "D"], &["7", "", "A", "B", "C", "D"]]);
        let parsed = parse_table(&t);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped_rows.len(), 1);
        assert_eq!(parsed.skipped_rows[0].row_number, 2);
    }

    #[test]
    fn unmapped_columns_ignored_but_extra_headers_kept() {
        let t = table(
            &["CTE", "", "Cod. Cliente", "PESO", "VOLUMES"],
            &[&["1", "lixo", "C-77", "10", "2"]],
        );
        let parsed = parse_table(&t);
        let r = &parsed.records[0];
        assert_eq!(r.text("COD_CLIENTE"), "C-77");
        assert!(!r.fields.values().any(|c| c == &Cell::Text("lixo".into())));
    }
}
