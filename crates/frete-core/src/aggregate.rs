use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::classify::{AlertReason, Classification, Classifier};
use crate::model::{field, Shipment};
use crate::parsing::normalize::{sanitize, sanitize_or};
use crate::parsing::values::{parse_numeric, parse_volumes};
use crate::rules::schema::{AlertLabels, GroupDefaults};

/// Per-carrier totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CarrierStats {
    pub count: usize,
    pub valor: Decimal,
    pub peso: Decimal,
    /// Records that are late or carry expired cargo.
    pub delays: usize,
}

/// Per-sender or per-receiver totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartyStats {
    pub count: usize,
    pub valor: Decimal,
}

/// Grouping keys derived from one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupKeys {
    pub carrier: String,
    /// Sender.
    pub client: String,
    pub receiver: String,
    pub occurrence: String,
    /// Sanitized perishable status; not a grouping dimension.
    pub perishable: String,
}

/// An accepted record with its classification and grouping keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedShipment {
    pub record: Shipment,
    pub classification: Classification,
    pub keys: GroupKeys,
}

/// Priority-list entry for a late, expired or at-risk shipment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub record: Shipment,
    /// Sanitized perishable status.
    pub status: String,
    /// Declared invoice value.
    pub value: Decimal,
    /// Late or expired.
    pub urgent: bool,
    pub reason: AlertReason,
    /// Display label for `reason`.
    pub label: String,
}

/// Dashboard view model built from one input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_ctes: usize,
    pub valor: Decimal,
    pub peso: Decimal,
    pub volumes: i64,
    pub delivered_count: usize,
    pub delayed_count: usize,
    pub on_time_count: usize,
    pub expired_count: usize,
    pub alerts: Vec<Alert>,
    pub carriers: BTreeMap<String, CarrierStats>,
    pub occurrences: BTreeMap<String, usize>,
    pub clients: BTreeMap<String, PartyStats>,
    pub receivers: BTreeMap<String, PartyStats>,
    pub records: Vec<ClassifiedShipment>,
}

/// Derive the grouping keys of a record, substituting the configured
/// names for blank fields.
pub fn group_keys(record: &Shipment, defaults: &GroupDefaults) -> GroupKeys {
    let key_or = |name: &str, fallback: &str| sanitize_or(record.get(name), fallback);

    GroupKeys {
        carrier: key_or(field::CIA_TRANSF, &defaults.carrier),
        client: key_or(field::REMETENTE, &defaults.party),
        receiver: key_or(field::DESTINATARIO, &defaults.party),
        occurrence: key_or(field::OCORRENCIA, &defaults.occurrence),
        perishable: sanitize(record.get(field::STATUS_PERECIVEL)),
    }
}

/// Fold mapped records into dashboard statistics in a single pass.
///
/// Every record lands in exactly one bucket per grouping dimension, and
/// `on_time_count + delayed_count == total_ctes`.
pub fn aggregate(
    records: &[Shipment],
    classifier: &Classifier,
    defaults: &GroupDefaults,
    labels: &AlertLabels,
) -> DashboardStats {
    let mut stats = DashboardStats::default();

    for record in records {
        let keys = group_keys(record, defaults);
        let cls = classifier.classify_parts(
            record.get(field::PREV_ENTREGA),
            &keys.occurrence,
            &keys.perishable,
        );
        let valor = parse_numeric(record.get(field::VALOR_NF));
        let peso = parse_numeric(record.get(field::PESO));

        stats.total_ctes += 1;
        add_saturating(&mut stats.valor, valor);
        add_saturating(&mut stats.peso, peso);
        stats.volumes = stats
            .volumes
            .saturating_add(parse_volumes(record.get(field::VOLUMES)));

        if cls.delivered {
            stats.delivered_count += 1;
        }
        if cls.late {
            stats.delayed_count += 1;
        } else {
            stats.on_time_count += 1;
        }
        if cls.expired {
            stats.expired_count += 1;
        }

        if cls.needs_alert() {
            stats.alerts.push(Alert {
                record: record.clone(),
                status: keys.perishable.clone(),
                value: valor,
                urgent: cls.urgent(),
                reason: cls.reason,
                label: cls.reason.label(labels).to_string(),
            });
        }

        let carrier = stats.carriers.entry(keys.carrier.clone()).or_default();
        carrier.count += 1;
        add_saturating(&mut carrier.valor, valor);
        add_saturating(&mut carrier.peso, peso);
        if cls.urgent() {
            carrier.delays += 1;
        }

        *stats.occurrences.entry(keys.occurrence.clone()).or_default() += 1;

        for (map, key) in [
            (&mut stats.clients, &keys.client),
            (&mut stats.receivers, &keys.receiver),
        ] {
            let party = map.entry(key.clone()).or_default();
            party.count += 1;
            add_saturating(&mut party.valor, valor);
        }

        stats.records.push(ClassifiedShipment {
            record: record.clone(),
            classification: cls,
            keys,
        });
    }

    tracing::info!(
        total = stats.total_ctes,
        delayed = stats.delayed_count,
        expired = stats.expired_count,
        alerts = stats.alerts.len(),
        "aggregated shipments"
    );

    stats
}

/// Add `value` to a running total, pinning the total at the representable
/// bound instead of overflowing.
fn add_saturating(total: &mut Decimal, value: Decimal) {
    *total = match total.checked_add(value) {
        Some(sum) => sum,
        None => {
            tracing::debug!(%total, %value, "decimal sum saturated");
            if value.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;
    use crate::rules::builtin::default_rules;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn classifier() -> Classifier {
        let now = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Classifier::new(&default_rules().unwrap(), now)
    }

    fn run(records: &[Shipment]) -> DashboardStats {
        let rules = default_rules().unwrap();
        aggregate(records, &classifier(), &rules.defaults, &rules.labels)
    }

    fn record(cte: &str, carrier: &str, occurrence: &str, deadline: &str, valor: &str) -> Shipment {
        [
            (field::CTE, cte),
            (field::CIA_TRANSF, carrier),
            (field::OCORRENCIA, occurrence),
            (field::PREV_ENTREGA, deadline),
            (field::VALOR_NF, valor),
            (field::PESO, "10,5"),
            (field::VOLUMES, "2"),
            (field::REMETENTE, "ACME"),
            (field::DESTINATARIO, "MERCADO SUL"),
        ]
        .into_iter()
        .collect()
    }

    fn sample() -> Vec<Shipment> {
        let mut expired = record("4", "", "EM ROTA", "", "50,00");
        expired.set(field::STATUS_PERECIVEL, Cell::from_text("VENCIDO"));
        let mut risky = record("5", "RODOSUL", "EM ROTA", "", "1");
        risky.set(field::STATUS_PERECIVEL, Cell::from_text("VENCE EM 12 HORAS"));
        vec![
            record("1", "RODOSUL", "ENTREGA REALIZADA", "01/01/2020 10:00", "1.000,00"),
            record("2", "RODOSUL", "EM ROTA", "01/01/2020 10:00", "250,50"),
            record("3", "TRANSNORTE", "EM ROTA", "01/01/2099 10:00", "100"),
            expired,
            risky,
        ]
    }

    #[test]
    fn counters_and_sums() {
        let stats = run(&sample());
        assert_eq!(stats.total_ctes, 5);
        assert_eq!(stats.delivered_count, 1);
        assert_eq!(stats.delayed_count, 1);
        assert_eq!(stats.on_time_count, 4);
        assert_eq!(stats.expired_count, 1);
        assert_eq!(stats.valor, dec!(1401.50));
        assert_eq!(stats.peso, dec!(52.5));
        assert_eq!(stats.volumes, 10);
    }

    #[test]
    fn on_time_plus_delayed_is_total() {
        let stats = run(&sample());
        assert_eq!(stats.on_time_count + stats.delayed_count, stats.total_ctes);
    }

    #[test]
    fn alerts_for_late_expired_and_risk() {
        let stats = run(&sample());
        let ctes: Vec<String> = stats.alerts.iter().map(|a| a.record.cte()).collect();
        assert_eq!(ctes, vec!["2", "4", "5"]);

        assert_eq!(stats.alerts[0].label, "PRAZO EXCEDIDO");
        assert!(stats.alerts[0].urgent);
        assert_eq!(stats.alerts[0].value, dec!(250.50));
        assert_eq!(stats.alerts[1].reason, AlertReason::Expired);
        assert_eq!(stats.alerts[1].status, "VENCIDO");
        assert!(!stats.alerts[2].urgent);
        assert_eq!(stats.alerts[2].label, "RISCO VENCIMENTO");
    }

    #[test]
    fn grouped_maps() {
        let stats = run(&sample());
        let rodosul = &stats.carriers["RODOSUL"];
        assert_eq!(rodosul.count, 3);
        assert_eq!(rodosul.delays, 1);
        assert_eq!(rodosul.valor, dec!(1251.50));
        assert_eq!(stats.carriers["PRÓPRIO"].count, 1);
        assert_eq!(stats.carriers["PRÓPRIO"].delays, 1);
        assert_eq!(stats.occurrences["EM ROTA"], 4);
        assert_eq!(stats.clients["ACME"].count, 5);
        assert_eq!(stats.receivers["MERCADO SUL"].valor, dec!(1401.50));
    }

    #[test]
    fn one_bucket_per_dimension() {
        let stats = run(&sample());
        let total = stats.total_ctes;
        assert_eq!(stats.carriers.values().map(|c| c.count).sum::<usize>(), total);
        assert_eq!(stats.occurrences.values().sum::<usize>(), total);
        assert_eq!(stats.clients.values().map(|c| c.count).sum::<usize>(), total);
        assert_eq!(stats.receivers.values().map(|c| c.count).sum::<usize>(), total);
    }

    #[test]
    fn blank_fields_use_group_defaults() {
        let blank: Shipment = [(field::CTE, "9")].into_iter().collect();
        let stats = run(&[blank]);
        assert!(stats.carriers.contains_key("PRÓPRIO"));
        assert!(stats.clients.contains_key("NÃO INFORMADO"));
        assert!(stats.receivers.contains_key("NÃO INFORMADO"));
        assert!(stats.occurrences.contains_key("SEM OCORRÊNCIA"));
    }

    #[test]
    fn idempotent() {
        let rows = sample();
        assert_eq!(run(&rows), run(&rows));
    }

    #[test]
    fn order_independent_values() {
        let rows = sample();
        let mut reversed = rows.clone();
        reversed.reverse();

        let a = run(&rows);
        let b = run(&reversed);
        assert_eq!(a.total_ctes, b.total_ctes);
        assert_eq!(a.valor, b.valor);
        assert_eq!(a.peso, b.peso);
        assert_eq!(a.volumes, b.volumes);
        assert_eq!(a.delayed_count, b.delayed_count);
        assert_eq!(a.on_time_count, b.on_time_count);
        assert_eq!(a.carriers, b.carriers);
        assert_eq!(a.occurrences, b.occurrences);
        assert_eq!(a.clients, b.clients);
        assert_eq!(a.receivers, b.receivers);
        assert_eq!(a.alerts.len(), b.alerts.len());
    }

    #[test]
    fn huge_values_saturate_instead_of_overflowing() {
        let huge = "50.000.000.000.000.000.000.000.000.000";
        let records = vec![
            record("1", "RODOSUL", "EM ROTA", "", huge),
            record("2", "RODOSUL", "EM ROTA", "", huge),
        ];
        let stats = run(&records);
        assert_eq!(stats.total_ctes, 2);
        assert_eq!(stats.valor, Decimal::MAX);
        assert_eq!(stats.carriers["RODOSUL"].valor, Decimal::MAX);
        assert_eq!(stats.clients["ACME"].valor, Decimal::MAX);
        assert_eq!(stats.receivers["MERCADO SUL"].valor, Decimal::MAX);
        assert_eq!(stats.peso, dec!(21));
    }

    #[test]
    fn volume_total_saturates() {
        let mut big = record("1", "RODOSUL", "EM ROTA", "", "1");
        big.set(field::VOLUMES, Cell::from_text("9223372036854775807"));
        let mut one = record("2", "RODOSUL", "EM ROTA", "", "1");
        one.set(field::VOLUMES, Cell::from_text("1"));

        let stats = run(&[big, one]);
        assert_eq!(stats.volumes, i64::MAX);
    }

    #[test]
    fn negative_sums_saturate_at_minimum() {
        let mut total = Decimal::MIN;
        add_saturating(&mut total, dec!(-1));
        assert_eq!(total, Decimal::MIN);
        add_saturating(&mut total, dec!(1));
        assert_eq!(total, Decimal::MIN + dec!(1));
    }

    #[test]
    fn empty_input_gives_zero_stats() {
        let stats = run(&[]);
        assert_eq!(stats, DashboardStats::default());
    }
}
