pub mod delimited;
pub mod workbook;

use std::path::Path;

use crate::error::FreteError;
use crate::model::Cell;
use delimited::DelimitedExtractor;
use workbook::WorkbookExtractor;

/// Header row plus data rows, exactly as read from the input file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Split the first row off as the header row.
    pub fn from_rows(mut rows: Vec<Vec<Cell>>) -> Result<RawTable, FreteError> {
        if rows.is_empty() {
            return Err(FreteError::EmptyInput);
        }
        let headers = rows.remove(0);
        Ok(RawTable { headers, rows })
    }
}

/// Trait for table extraction backends.
pub trait TableExtractor: Send + Sync {
    /// Read the raw file bytes into a header row and data rows.
    fn extract_table(&self, bytes: &[u8]) -> Result<RawTable, FreteError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited,
    /// `.tsv`/`.tab` files, always split on tabs.
    TabSeparated,
    Workbook,
}

impl InputFormat {
    /// Pick the format from the file extension. Anything that is not a
    /// known workbook or tab-separated extension is read as delimited text
    /// with a detected delimiter.
    pub fn from_path(path: &Path) -> InputFormat {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => InputFormat::Workbook,
            "tsv" | "tab" => InputFormat::TabSeparated,
            _ => InputFormat::Delimited,
        }
    }

    pub fn extractor(self) -> Box<dyn TableExtractor> {
        match self {
            InputFormat::Delimited => Box::new(DelimitedExtractor::new()),
            InputFormat::TabSeparated => Box::new(DelimitedExtractor::with_delimiter(b'\t')),
            InputFormat::Workbook => Box::new(WorkbookExtractor),
        }
    }
}
