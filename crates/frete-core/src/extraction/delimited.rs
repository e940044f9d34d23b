use encoding_rs::WINDOWS_1252;

use crate::error::FreteError;
use crate::extraction::{RawTable, TableExtractor};
use crate::model::Cell;

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Reads delimited text exports (CSV and friends).
///
/// Exports are windows-1252 encoded (the superset of Latin-1 that Windows
/// tools write). A file starting with a UTF-8 byte order mark is decoded as
/// UTF-8 instead.
#[derive(Debug, Clone, Default)]
pub struct DelimitedExtractor {
    delimiter: Option<u8>,
}

impl DelimitedExtractor {
    /// Extractor that detects the delimiter from the header line.
    pub fn new() -> Self {
        Self { delimiter: None }
    }

    /// Extractor with a fixed delimiter, for formats that name theirs.
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }
}

impl TableExtractor for DelimitedExtractor {
    fn extract_table(&self, bytes: &[u8]) -> Result<RawTable, FreteError> {
        let text = decode_text(bytes);
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| detect_delimiter(&text));

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.len() == 1 && record[0].trim().is_empty() {
                continue;
            }
            rows.push(record.iter().map(Cell::from_text).collect());
        }

        tracing::debug!(
            rows = rows.len(),
            delimiter = %char::from(delimiter).escape_default(),
            "read delimited text"
        );

        RawTable::from_rows(rows)
    }

    fn backend_name(&self) -> &str {
        "delimited"
    }
}

fn decode_text(bytes: &[u8]) -> String {
    match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => String::from_utf8_lossy(rest).into_owned(),
        None => decode_windows_1252(bytes),
    }
}

/// Decode windows-1252 bytes. 0x80-0x9F map to punctuation such as `€`
/// and curly quotes; every other byte matches ISO-8859-1.
pub fn decode_windows_1252(bytes: &[u8]) -> String {
    let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Pick the delimiter occurring most often (outside quotes) on the first
/// non-empty line. Falls back to a comma.
pub fn detect_delimiter(text: &str) -> u8 {
    let Some(line) = text.lines().find(|l| !l.trim().is_empty()) else {
        return b',';
    };

    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(i) = CANDIDATE_DELIMITERS.iter().position(|&d| d == b) {
            counts[i] += 1;
        }
    }

    counts
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > 0)
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map(|(i, _)| CANDIDATE_DELIMITERS[i])
        .unwrap_or(b',')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_accents_decoded() {
        // "OCORRÊNCIA" in ISO-8859-1
        let bytes = b"OCORR\xCANCIA";
        assert_eq!(decode_windows_1252(bytes), "OCORRÊNCIA");
    }

    #[test]
    fn windows_punctuation_decoded() {
        assert_eq!(decode_windows_1252(b"\x80\x93\x94"), "€“”");

        let table = DelimitedExtractor::new()
            .extract_table(b"CTE;REMETENTE\n1;CAF\x80 \x93BOM\x94\n")
            .unwrap();
        assert_eq!(table.rows[0][1], Cell::Text("CAF€ “BOM”".into()));
    }

    #[test]
    fn semicolon_delimiter_detected() {
        assert_eq!(detect_delimiter("CTE;DATA;CIDADE\n1;2;3"), b';');
        assert_eq!(detect_delimiter("\n\nCTE\tPESO\n"), b'\t');
        assert_eq!(detect_delimiter("CTE,PESO"), b',');
    }

    #[test]
    fn quoted_delimiters_ignored() {
        assert_eq!(detect_delimiter("\"A;B;C\",D,E"), b',');
    }

    #[test]
    fn single_column_defaults_to_comma() {
        assert_eq!(detect_delimiter("CTE"), b',');
    }

    #[test]
    fn rows_read_with_ragged_lengths() {
        let text = "CTE;PESO;VOLUMES\n\n123;10,5;2\n456;1\n";
        let table = DelimitedExtractor::new()
            .extract_table(text.as_bytes())
            .unwrap();
        assert_eq!(table.headers.len(), 3);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], Cell::Text("10,5".into()));
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn empty_fields_become_empty_cells() {
        let table = DelimitedExtractor::new()
            .extract_table(b"CTE,MANIFESTO\n,M1\n")
            .unwrap();
        assert_eq!(table.rows[0][0], Cell::Empty);
    }

    #[test]
    fn fixed_delimiter_skips_detection() {
        // Commas outnumber tabs on the header line.
        let text = b"CTE\tREMETENTE, FILIAL, UF\n1\tACME, 2, SP\n";
        assert_eq!(detect_delimiter("CTE\tREMETENTE, FILIAL, UF"), b',');

        let table = DelimitedExtractor::with_delimiter(b'\t')
            .extract_table(text)
            .unwrap();
        assert_eq!(table.headers.len(), 2);
        assert_eq!(table.rows[0][1], Cell::Text("ACME, 2, SP".into()));
    }

    #[test]
    fn utf8_bom_switches_decoding() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("DESTINATÁRIO,CTE\nX,1\n".as_bytes());
        let table = DelimitedExtractor::new().extract_table(&bytes).unwrap();
        assert_eq!(table.headers[0], Cell::Text("DESTINATÁRIO".into()));
    }

    #[test]
    fn empty_file_is_an_error() {
        assert!(matches!(
            DelimitedExtractor::new().extract_table(b""),
            Err(FreteError::EmptyInput)
        ));
    }
}
