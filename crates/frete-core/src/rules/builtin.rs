use crate::error::FreteError;
use crate::rules::parse_ruleset_str;
use crate::rules::schema::RuleSetDef;

const DEFAULT_RULES_JSON: &str = include_str!("../../../../rules/default.json");

/// Available predefined rulesets.
pub const PRESETS: &[&str] = &["default"];

/// Load a predefined ruleset by name.
pub fn load_preset(name: &str) -> Result<RuleSetDef, FreteError> {
    match name {
        "default" => parse_ruleset_str(DEFAULT_RULES_JSON),
        _ => Err(FreteError::UnknownPreset {
            name: name.to_string(),
            available: PRESETS.join(", "),
        }),
    }
}

/// The ruleset used when no `--rules` file is given.
pub fn default_rules() -> Result<RuleSetDef, FreteError> {
    load_preset("default")
}
