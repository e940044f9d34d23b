use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FreteError {
    #[error("failed to read workbook: {0}")]
    Workbook(String),

    #[error("failed to read delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("input file has no rows")]
    EmptyInput,

    #[error("failed to parse input: {0}")]
    ParseError(String),

    #[error("failed to load ruleset from {path}: {reason}")]
    RulesetLoad { path: PathBuf, reason: String },

    #[error("invalid ruleset: {0}")]
    RulesetInvalid(String),

    #[error("unknown preset '{name}'. Available: {available}")]
    UnknownPreset { name: String, available: String },

    #[error("invalid timestamp '{0}'. Expected YYYY-MM-DD HH:MM or DD/MM/YYYY HH:MM")]
    InvalidTimestamp(String),

    #[error("no shipment with CT-e '{0}' in this file")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
