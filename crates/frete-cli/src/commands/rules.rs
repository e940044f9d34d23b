use frete_core::error::FreteError;
use frete_core::rules::builtin;
use std::path::Path;

use crate::output;

pub fn list() -> Result<(), FreteError> {
    println!("Available predefined rulesets:\n");
    for name in builtin::PRESETS {
        let rs = builtin::load_preset(name)?;
        println!("  {:<8} {} (v{})", name, rs.name, rs.version);
        if let Some(ref desc) = rs.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(name: &str, output_format: &str) -> Result<(), FreteError> {
    let rs = builtin::load_preset(name)?;
    match output_format {
        "json" => output::json::print(&rs),
        _ => {
            output::table::print_ruleset(&rs);
            Ok(())
        }
    }
}

pub fn schema() -> Result<(), FreteError> {
    print!(
        r#"JSON Rule Schema
================

A rule file sets the keywords used to classify shipments and the labels
shown on the dashboard. Pass it with `frete --rules FILE <command>`.
All keyword matching is case-insensitive substring matching on the
sanitized (quote-free, uppercased) field text.

Top-level fields:
  name          (string, required)  Human-readable name of the ruleset
  description   (string, optional)  What this ruleset is for
  version       (string, required)  Version identifier (e.g., "2025.1")
  delivered_keywords
                (array, required)   A shipment is delivered when its
                                    occurrence contains any of these.
  finalized_status_keywords
                (array, required)   ...or when its perishable status
                                    contains any of these.
  expired_keyword
                (string, required)  Perishable status marking expired cargo.
  not_expired_markers
                (array, required)   Statuses containing any of these are
                                    never expired (e.g., "NAO VENCIDO").
  risk_keyword  (string, required)  Perishable status marking an hours-based
                                    countdown (at risk).
  hidden_occurrences
                (array, optional)   Occurrences left out of the occurrence
                                    ranking. They are still counted.
  defaults      (object, optional)  Group names for blank fields:
                                    carrier, party (sender and receiver),
                                    occurrence.
  labels        (object, optional)  Alert labels: late_and_expired, expired,
                                    late, expiry_risk, in_flow.

Example:
{{
  "name": "Regras da filial sul",
  "version": "1.0",
  "delivered_keywords": ["ENTREGUE", "BAIXA", "RECEBIDO"],
  "finalized_status_keywords": ["FINALIZADO"],
  "expired_keyword": "VENCIDO",
  "not_expired_markers": ["NAO VENCIDO", "NAO APLICAVEL"],
  "risk_keyword": "HORAS",
  "hidden_occurrences": ["NAO APLICAVEL"],
  "defaults": {{
    "carrier": "FROTA PRÓPRIA"
  }},
  "labels": {{
    "late": "ATRASADO"
  }}
}}

Omitted defaults and labels fall back to the built-in values
(see `frete rules show default`).
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), FreteError> {
    let rs = frete_core::rules::load_ruleset(file)?;

    println!("Ruleset '{}' (v{}) is valid.", rs.name, rs.version);
    println!(
        "  Delivered keywords: {}",
        rs.delivered_keywords.join(", ")
    );
    println!("  Expired keyword: {}", rs.expired_keyword);
    println!("  Risk keyword: {}", rs.risk_keyword);

    // Potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    let expired = rs.expired_keyword.to_uppercase();
    let risk = rs.risk_keyword.to_uppercase();
    for keyword in &rs.delivered_keywords {
        let upper = keyword.to_uppercase();
        if upper.contains(&expired) || upper.contains(&risk) {
            warnings.push(format!(
                "delivered keyword '{keyword}' overlaps the expired or risk keyword"
            ));
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
