pub mod builtin;
pub mod schema;

use crate::error::FreteError;
use schema::RuleSetDef;
use std::path::Path;

/// Load a ruleset from a JSON file.
pub fn load_ruleset(path: &Path) -> Result<RuleSetDef, FreteError> {
    let content = std::fs::read_to_string(path).map_err(|e| FreteError::RulesetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_ruleset(&content, path)
}

/// Parse a ruleset from a JSON string.
pub fn parse_ruleset(json: &str, source: &Path) -> Result<RuleSetDef, FreteError> {
    let ruleset: RuleSetDef = serde_json::from_str(json).map_err(|e| FreteError::RulesetLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_ruleset(&ruleset)?;
    Ok(ruleset)
}

/// Parse a ruleset from a JSON string (no file path context), as used
/// for the embedded presets.
pub fn parse_ruleset_str(json: &str) -> Result<RuleSetDef, FreteError> {
    let ruleset: RuleSetDef = serde_json::from_str(json)?;
    validate_ruleset(&ruleset)?;
    Ok(ruleset)
}

/// Validate that a ruleset is well-formed.
pub fn validate_ruleset(ruleset: &RuleSetDef) -> Result<(), FreteError> {
    if ruleset.name.trim().is_empty() {
        return Err(FreteError::RulesetInvalid("name must not be empty".into()));
    }

    if ruleset.version.trim().is_empty() {
        return Err(FreteError::RulesetInvalid(
            "version must not be empty".into(),
        ));
    }

    let lists = [
        ("delivered_keywords", &ruleset.delivered_keywords),
        ("finalized_status_keywords", &ruleset.finalized_status_keywords),
        ("not_expired_markers", &ruleset.not_expired_markers),
    ];
    for (list_name, list) in lists {
        if list.is_empty() {
            return Err(FreteError::RulesetInvalid(format!(
                "{list_name} must not be empty"
            )));
        }
        if list.iter().any(|k| k.trim().is_empty()) {
            return Err(FreteError::RulesetInvalid(format!(
                "{list_name} contains an empty keyword"
            )));
        }
    }

    for (key, value) in [
        ("expired_keyword", &ruleset.expired_keyword),
        ("risk_keyword", &ruleset.risk_keyword),
    ] {
        if value.trim().is_empty() {
            return Err(FreteError::RulesetInvalid(format!("{key} must not be empty")));
        }
    }

    let labels = &ruleset.labels;
    for (key, value) in [
        ("late_and_expired", &labels.late_and_expired),
        ("expired", &labels.expired),
        ("late", &labels.late),
        ("expiry_risk", &labels.expiry_risk),
        ("in_flow", &labels.in_flow),
    ] {
        if value.trim().is_empty() {
            return Err(FreteError::RulesetInvalid(format!(
                "label '{key}' must not be empty"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "name": "Test",
        "version": "1.0",
        "delivered_keywords": ["ENTREGUE"],
        "finalized_status_keywords": ["FINALIZADO"],
        "expired_keyword": "VENCIDO",
        "not_expired_markers": ["NAO VENCIDO"],
        "risk_keyword": "HORAS"
    }"#;

    #[test]
    fn test_parse_minimal_ruleset() {
        let rs = parse_ruleset_str(MINIMAL).unwrap();
        assert_eq!(rs.name, "Test");
        assert_eq!(rs.delivered_keywords, vec!["ENTREGUE"]);
        // Omitted sections fall back to the dashboard defaults.
        assert_eq!(rs.defaults.carrier, "PRÓPRIO");
        assert_eq!(rs.labels.in_flow, "EM FLUXO");
        assert!(rs.hidden_occurrences.is_empty());
    }

    #[test]
    fn test_empty_keyword_list_rejected() {
        let json = MINIMAL.replace(r#"["ENTREGUE"]"#, "[]");
        assert!(matches!(
            parse_ruleset_str(&json),
            Err(FreteError::RulesetInvalid(_))
        ));
    }

    #[test]
    fn test_blank_keyword_rejected() {
        let json = MINIMAL.replace(r#"["NAO VENCIDO"]"#, r#"["NAO VENCIDO", " "]"#);
        assert!(parse_ruleset_str(&json).is_err());
    }

    #[test]
    fn test_blank_label_rejected() {
        let json = MINIMAL.replace(
            r#""risk_keyword": "HORAS""#,
            r#""risk_keyword": "HORAS", "labels": { "late": "" }"#,
        );
        assert!(parse_ruleset_str(&json).is_err());
    }

    #[test]
    fn test_missing_field_reports_path() {
        let err = parse_ruleset(r#"{"name": "x"}"#, Path::new("custom.json")).unwrap_err();
        match err {
            FreteError::RulesetLoad { path, .. } => assert_eq!(path, Path::new("custom.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, MINIMAL).unwrap();
        let rs = load_ruleset(&path).unwrap();
        assert_eq!(rs.version, "1.0");
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = load_ruleset(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(matches!(err, FreteError::RulesetLoad { .. }));
    }
}
