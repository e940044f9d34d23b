use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical field names produced by the header mapper.
pub mod field {
    pub const CTE: &str = "CTE";
    pub const MANIFESTO: &str = "MANIFESTO";
    pub const DATA_EMISSAO: &str = "DATA_EMISSAO";
    pub const DATA_COLETA: &str = "DATA_COLETA";
    pub const DATA_OCORRENCIA: &str = "DATA_OCORRENCIA";
    pub const CIDADE_ORIGEM: &str = "CIDADE_ORIGEM";
    pub const CIDADE_DESTINO: &str = "CIDADE_DESTINO";
    pub const REMETENTE: &str = "REMETENTE";
    pub const DESTINATARIO: &str = "DESTINATARIO";
    pub const VALOR_NF: &str = "VALOR_NF";
    pub const PESO: &str = "PESO";
    pub const VOLUMES: &str = "VOLUMES";
    pub const OCORRENCIA: &str = "OCORRENCIA";
    pub const PREV_ENTREGA: &str = "PREV_ENTREGA";
    pub const STATUS_PERECIVEL: &str = "STATUS_PERECIVEL";
    pub const DATA_STATUS: &str = "DATA_STATUS";
    pub const CIA_TRANSF: &str = "CIA_TRANSF";
    pub const RESP_ENTREGA: &str = "RESP_ENTREGA";
    pub const DOCUMENTOS: &str = "DOCUMENTOS";
}

/// A single spreadsheet cell as read from the input file.
///
/// Workbook date cells are carried as their serial day number, so every
/// date-bearing field goes through the same parsing path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a cell from a raw text field; empty text becomes `Empty`.
    pub fn from_text(s: &str) -> Cell {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    /// False for empty cells, empty text and the number zero.
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Number(n) => *n != 0.0 && !n.is_nan(),
            Cell::Text(s) => !s.is_empty(),
        }
    }

    /// Text rendering of the cell (numbers use their shortest form).
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::from_text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// One shipment row, keyed by canonical field name.
///
/// Columns the header mapper does not recognise are kept under their
/// slugified header, so no data from the export is lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shipment {
    pub fields: BTreeMap<String, Cell>,
}

impl Shipment {
    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.fields.get(name)
    }

    /// Field rendered as text; missing fields render as an empty string.
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(Cell::to_text).unwrap_or_default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Cell) {
        self.fields.insert(name.into(), value);
    }

    /// True when the field exists and holds a truthy value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(Cell::is_truthy)
    }

    pub fn cte(&self) -> String {
        self.text(field::CTE)
    }
}

impl<K: Into<String>, V: Into<Cell>> FromIterator<(K, V)> for Shipment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Shipment {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_spreadsheet_blanks() {
        assert!(!Cell::Empty.is_truthy());
        assert!(!Cell::Number(0.0).is_truthy());
        assert!(!Cell::from_text("").is_truthy());
        assert!(Cell::from_text("0").is_truthy());
        assert!(Cell::Number(12345.0).is_truthy());
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(Cell::Number(44000.0).to_text(), "44000");
        assert_eq!(Cell::Number(44000.5).to_text(), "44000.5");
    }

    #[test]
    fn missing_field_renders_empty() {
        let s: Shipment = [(field::CTE, "123")].into_iter().collect();
        assert_eq!(s.cte(), "123");
        assert_eq!(s.text(field::PESO), "");
        assert!(!s.has(field::MANIFESTO));
    }
}
