pub mod alerts;
pub mod headers;
pub mod list;
pub mod parse;
pub mod rules;
pub mod show;
pub mod summary;

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use frete_core::error::FreteError;
use frete_core::parsing::dates::parse_timestamp;
use frete_core::rules::builtin;
use frete_core::rules::schema::RuleSetDef;

/// Settings shared by every command that classifies shipments.
pub struct Context {
    pub rules: RuleSetDef,
    /// Reference instant for deadline checks.
    pub now: NaiveDateTime,
    pub output: String,
}

impl Context {
    pub fn load(
        rules_file: Option<&Path>,
        now: Option<&str>,
        output: &str,
    ) -> Result<Self, FreteError> {
        let rules = match rules_file {
            Some(path) => frete_core::rules::load_ruleset(path)?,
            None => builtin::default_rules()?,
        };

        let now = match now {
            Some(raw) => {
                parse_timestamp(raw).ok_or_else(|| FreteError::InvalidTimestamp(raw.to_string()))?
            }
            None => Local::now().naive_local(),
        };

        tracing::info!(ruleset = %rules.name, %now, "using ruleset");

        Ok(Context {
            rules,
            now,
            output: output.to_string(),
        })
    }

    pub fn json(&self) -> bool {
        self.output == "json"
    }
}
