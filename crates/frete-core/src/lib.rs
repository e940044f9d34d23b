pub mod aggregate;
pub mod classify;
pub mod display;
pub mod drilldown;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod rules;

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;

use aggregate::{aggregate, DashboardStats};
use classify::Classifier;
use error::FreteError;
use extraction::{InputFormat, RawTable, TableExtractor};
use parsing::{parse_table, ParsedTable, SkippedRow};
use rules::schema::RuleSetDef;

/// Dashboard state for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// Name of the ruleset that was applied.
    pub ruleset: String,
    /// Instant deadlines were compared against.
    pub reference_time: NaiveDateTime,
    /// Data rows that did not become records.
    pub skipped_rows: Vec<SkippedRow>,
    pub stats: DashboardStats,
}

/// Main API entry point: extract, map, classify and aggregate one file.
///
/// `now` is the reference instant for deadline checks, so the same input
/// and `now` always give the same dashboard.
pub fn analyze(
    bytes: &[u8],
    extractor: &dyn TableExtractor,
    rules: &RuleSetDef,
    now: NaiveDateTime,
) -> Result<Dashboard, FreteError> {
    let table = extractor.extract_table(bytes)?;
    tracing::debug!(
        backend = extractor.backend_name(),
        rows = table.rows.len(),
        "extracted table"
    );
    Ok(analyze_table(&table, rules, now))
}

/// Map, classify and aggregate an already extracted table.
pub fn analyze_table(table: &RawTable, rules: &RuleSetDef, now: NaiveDateTime) -> Dashboard {
    let parsed = parse_table(table);
    let classifier = Classifier::new(rules, now);
    let stats = aggregate(&parsed.records, &classifier, &rules.defaults, &rules.labels);

    Dashboard {
        ruleset: rules.name.clone(),
        reference_time: now,
        skipped_rows: parsed.skipped_rows,
        stats,
    }
}

/// Read a file from disk, picking the extractor from its extension.
pub fn read_table(path: &Path) -> Result<RawTable, FreteError> {
    let bytes = std::fs::read(path)?;
    let format = InputFormat::from_path(path);
    tracing::info!(path = %path.display(), ?format, bytes = bytes.len(), "reading input");
    format.extractor().extract_table(&bytes)
}

/// Read and map a file without classifying it.
pub fn parse_file(path: &Path) -> Result<ParsedTable, FreteError> {
    Ok(parse_table(&read_table(path)?))
}

pub fn analyze_file(
    path: &Path,
    rules: &RuleSetDef,
    now: NaiveDateTime,
) -> Result<Dashboard, FreteError> {
    let table = read_table(path)?;
    Ok(analyze_table(&table, rules, now))
}
