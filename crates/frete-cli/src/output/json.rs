use serde::Serialize;
use serde_json::{json, Value};

use frete_core::drilldown::{
    ranked_carriers, ticker, top_clients, top_occurrences, top_receivers,
};
use frete_core::error::FreteError;
use frete_core::rules::schema::RuleSetDef;
use frete_core::Dashboard;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), FreteError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Dashboard view without the per-record list.
pub fn summary(dashboard: &Dashboard, rules: &RuleSetDef) -> Value {
    let stats = &dashboard.stats;
    json!({
        "ruleset": dashboard.ruleset,
        "reference_time": dashboard.reference_time,
        "skipped_rows": dashboard.skipped_rows,
        "kpis": {
            "total_ctes": stats.total_ctes,
            "valor": stats.valor,
            "peso": stats.peso,
            "volumes": stats.volumes,
            "delivered": stats.delivered_count,
            "delayed": stats.delayed_count,
            "on_time": stats.on_time_count,
            "expired": stats.expired_count,
            "alerts": stats.alerts.len(),
        },
        "rankings": {
            "carriers": ranked_carriers(stats),
            "occurrences": top_occurrences(stats, &rules.hidden_occurrences),
            "clients": top_clients(stats),
            "receivers": top_receivers(stats),
        },
        "ticker": ticker(&stats.alerts),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use frete_core::extraction::RawTable;
    use frete_core::model::Cell;
    use frete_core::rules::builtin::default_rules;

    #[test]
    fn summary_has_kpis_and_rankings() {
        let rules = default_rules().unwrap();
        let table = RawTable {
            headers: ["CTE", "Remetente", "Destinatario", "Ocorrencia", "Prev Entrega", "CIA Transf"]
                .iter()
                .map(|s| Cell::from_text(s))
                .collect(),
            rows: vec![["1", "ACME", "MERCADO", "EM ROTA", "01/01/2020 10:00", "RODOSUL"]
                .iter()
                .map(|s| Cell::from_text(s))
                .collect()],
        };
        let now = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let dashboard = frete_core::analyze_table(&table, &rules, now);

        let value = summary(&dashboard, &rules);
        assert_eq!(value["kpis"]["total_ctes"], 1);
        assert_eq!(value["kpis"]["delayed"], 1);
        assert_eq!(value["rankings"]["carriers"][0]["name"], "RODOSUL");
        assert_eq!(value["ticker"].as_array().unwrap().len(), 3);
        assert_eq!(value["ticker"][0]["label"], "PRAZO EXCEDIDO");
    }
}
