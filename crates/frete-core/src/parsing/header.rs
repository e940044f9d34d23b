use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{field, Cell};
use crate::parsing::normalize::{clean_header, slugify};

/// Column index -> canonical field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeaderMapping {
    columns: BTreeMap<usize, String>,
}

impl HeaderMapping {
    pub fn field(&self, column: usize) -> Option<&str> {
        self.columns.get(&column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.columns.iter().map(|(&i, f)| (i, f.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One header column as shown by `frete headers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderColumn {
    pub index: usize,
    pub raw: String,
    /// `None` when the header was blank and the column is ignored.
    pub field: Option<String>,
}

/// Map raw header cells to canonical field names.
///
/// Bare "DATA" headers are told apart by position (emission, pickup, then
/// occurrence date) and so are bare "CIDADE" headers (origin, destination).
/// Unknown headers are slugified and kept. Only blank headers are dropped.
pub fn map_headers(headers: &[Cell]) -> HeaderMapping {
    let mut columns = BTreeMap::new();
    let mut data_seen = 0;
    let mut cidade_seen = 0;

    for (index, raw) in headers.iter().enumerate() {
        if !raw.is_truthy() {
            tracing::debug!(column = index, "blank header; column ignored");
            continue;
        }
        let clean = clean_header(&raw.to_text());
        if clean.is_empty() {
            tracing::debug!(column = index, raw = %raw, "header blank after cleaning; column ignored");
            continue;
        }

        let name = match clean.as_str() {
            "DATA" => {
                data_seen += 1;
                match data_seen {
                    1 => field::DATA_EMISSAO.to_string(),
                    2 => field::DATA_COLETA.to_string(),
                    _ => field::DATA_OCORRENCIA.to_string(),
                }
            }
            "CIDADE" => {
                cidade_seen += 1;
                if cidade_seen == 1 {
                    field::CIDADE_ORIGEM.to_string()
                } else {
                    field::CIDADE_DESTINO.to_string()
                }
            }
            _ => match match_keyword(&clean) {
                Some(known) => known.to_string(),
                None => slugify(&clean),
            },
        };

        columns.insert(index, name);
    }

    HeaderMapping { columns }
}

/// Describe every header column, including ignored ones.
pub fn describe_headers(headers: &[Cell]) -> Vec<HeaderColumn> {
    let mapping = map_headers(headers);
    headers
        .iter()
        .enumerate()
        .map(|(index, raw)| HeaderColumn {
            index,
            raw: raw.to_text(),
            field: mapping.field(index).map(str::to_string),
        })
        .collect()
}

/// Ordered keyword rules; the first match wins.
fn match_keyword(clean: &str) -> Option<&'static str> {
    let name = if clean.contains("M D") {
        field::MANIFESTO
    } else if clean == "CTE" {
        field::CTE
    } else if clean.contains("REMETENT") {
        field::REMETENTE
    } else if clean.contains("DESTINAT") {
        field::DESTINATARIO
    } else if clean.contains("NF VALOR") || clean == "VALOR_NF" {
        field::VALOR_NF
    } else if clean == "PESO" {
        field::PESO
    } else if clean == "VOLUMES" {
        field::VOLUMES
    } else if clean.contains("OCORRENCIA") {
        field::OCORRENCIA
    } else if clean.contains("PREV") {
        field::PREV_ENTREGA
    } else if clean.contains("STATUS PEREC") {
        field::STATUS_PERECIVEL
    } else if clean.contains("DATA STATUS") {
        field::DATA_STATUS
    } else if clean.contains("CIA TRANSF") {
        field::CIA_TRANSF
    } else if clean.contains("RESP") && clean.contains("ENTREGA") {
        field::RESP_ENTREGA
    } else if clean.contains("NFS/DOC") {
        field::DOCUMENTOS
    } else {
        return None;
    };
    Some(name)
}
