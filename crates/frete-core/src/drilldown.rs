//! Queries behind the dashboard drill-downs: KPI and group lists, search,
//! CT-e lookup, rankings, the alert ticker and the shipment detail view.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{Alert, ClassifiedShipment, DashboardStats, PartyStats};
use crate::classify::Classification;
use crate::display::{format_brl, share_percent};
use crate::error::FreteError;
use crate::model::{field, Shipment};
use crate::parsing::dates::{format_display_date, format_display_datetime};
use crate::parsing::normalize::{fold_accents, sanitize, sanitize_str, strip_quotes};
use crate::parsing::values::parse_numeric;

/// Entries shown in the occurrence, client and receiver rankings.
pub const TOP_N: usize = 10;
/// Length of the scrolling alert ticker.
pub const TICKER_LEN: usize = 30;
const TICKER_REPEAT: usize = 3;

/// Records behind one of the KPI cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiList {
    Delivered,
    Late,
    Expired,
    OnTime,
}

impl KpiList {
    pub fn title(&self) -> &'static str {
        match self {
            KpiList::Delivered => "Remessas Entregues",
            KpiList::Late => "Atrasos de Entrega",
            KpiList::Expired => "Perecíveis Vencidos",
            KpiList::OnTime => "Dentro do Prazo",
        }
    }

    pub fn matches(&self, cls: &Classification) -> bool {
        match self {
            KpiList::Delivered => cls.delivered,
            KpiList::Late => cls.late,
            KpiList::Expired => cls.expired,
            KpiList::OnTime => cls.on_time(),
        }
    }
}

impl FromStr for KpiList {
    type Err = FreteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "delivered" => Ok(KpiList::Delivered),
            "late" | "delayed" => Ok(KpiList::Late),
            "expired" => Ok(KpiList::Expired),
            "on-time" | "ontime" => Ok(KpiList::OnTime),
            other => Err(FreteError::ParseError(format!(
                "unknown KPI list '{other}' (expected delivered, late, expired or on-time)"
            ))),
        }
    }
}

impl fmt::Display for KpiList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KpiList::Delivered => "delivered",
            KpiList::Late => "late",
            KpiList::Expired => "expired",
            KpiList::OnTime => "on-time",
        };
        f.write_str(name)
    }
}

/// Grouping dimension of the dashboard breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupDimension {
    Carrier,
    Occurrence,
    /// Sender.
    Client,
    Receiver,
}

impl GroupDimension {
    pub fn key<'a>(&self, shipment: &'a ClassifiedShipment) -> &'a str {
        match self {
            GroupDimension::Carrier => &shipment.keys.carrier,
            GroupDimension::Occurrence => &shipment.keys.occurrence,
            GroupDimension::Client => &shipment.keys.client,
            GroupDimension::Receiver => &shipment.keys.receiver,
        }
    }
}

impl FromStr for GroupDimension {
    type Err = FreteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "carrier" => Ok(GroupDimension::Carrier),
            "occurrence" => Ok(GroupDimension::Occurrence),
            "client" | "sender" => Ok(GroupDimension::Client),
            "receiver" => Ok(GroupDimension::Receiver),
            other => Err(FreteError::ParseError(format!(
                "unknown group '{other}' (expected carrier, occurrence, client or receiver)"
            ))),
        }
    }
}

pub fn kpi_records(stats: &DashboardStats, kpi: KpiList) -> Vec<&ClassifiedShipment> {
    stats
        .records
        .iter()
        .filter(|s| kpi.matches(&s.classification))
        .collect()
}

/// Records in one bucket of a grouping dimension. `name` is sanitized
/// the same way the aggregator builds its keys.
pub fn group_records<'a>(
    stats: &'a DashboardStats,
    dimension: GroupDimension,
    name: &str,
) -> Vec<&'a ClassifiedShipment> {
    let wanted = sanitize_str(name);
    stats
        .records
        .iter()
        .filter(|s| dimension.key(s) == wanted)
        .collect()
}

/// Case-insensitive substring match on CT-e, receiver or sender.
/// An empty term matches everything.
pub fn matches_search(record: &Shipment, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    [field::CTE, field::DESTINATARIO, field::REMETENTE]
        .iter()
        .any(|name| record.text(name).to_lowercase().contains(&term))
}

pub fn search<'a>(list: Vec<&'a ClassifiedShipment>, term: &str) -> Vec<&'a ClassifiedShipment> {
    list.into_iter()
        .filter(|s| matches_search(&s.record, term))
        .collect()
}

pub fn search_alerts<'a>(alerts: &'a [Alert], term: &str) -> Vec<&'a Alert> {
    alerts
        .iter()
        .filter(|a| matches_search(&a.record, term))
        .collect()
}

/// First record whose CT-e equals `cte`, ignoring quotes and surrounding
/// whitespace.
pub fn find_by_cte<'a>(stats: &'a DashboardStats, cte: &str) -> Result<&'a ClassifiedShipment, FreteError> {
    let wanted = strip_quotes(cte.trim());
    stats
        .records
        .iter()
        .find(|s| strip_quotes(s.record.cte().trim()) == wanted)
        .ok_or_else(|| FreteError::NotFound(format!("CT-e {wanted}")))
}

/// One line of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    pub name: String,
    pub count: usize,
    /// Declared value, for dimensions that track it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor: Option<Decimal>,
    /// Late-or-expired records, carriers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delays: Option<usize>,
    /// Share of all records, in percent with one decimal.
    pub share: Decimal,
}

fn rank(mut entries: Vec<RankEntry>, limit: Option<usize>) -> Vec<RankEntry> {
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}

/// All carriers by record count.
pub fn ranked_carriers(stats: &DashboardStats) -> Vec<RankEntry> {
    let entries = stats
        .carriers
        .iter()
        .map(|(name, c)| RankEntry {
            name: name.clone(),
            count: c.count,
            valor: Some(c.valor),
            delays: Some(c.delays),
            share: share_percent(c.count, stats.total_ctes),
        })
        .collect();
    rank(entries, None)
}

/// Top occurrences, leaving out `hidden` ones (compared without accents).
pub fn top_occurrences(stats: &DashboardStats, hidden: &[String]) -> Vec<RankEntry> {
    let hidden: Vec<String> = hidden
        .iter()
        .map(|h| fold_accents(&sanitize_str(h)))
        .collect();
    let entries = stats
        .occurrences
        .iter()
        .filter(|(name, _)| !hidden.contains(&fold_accents(name)))
        .map(|(name, count)| RankEntry {
            name: name.clone(),
            count: *count,
            valor: None,
            delays: None,
            share: share_percent(*count, stats.total_ctes),
        })
        .collect();
    rank(entries, Some(TOP_N))
}

pub fn top_clients(stats: &DashboardStats) -> Vec<RankEntry> {
    top_parties(&stats.clients, stats.total_ctes)
}

pub fn top_receivers(stats: &DashboardStats) -> Vec<RankEntry> {
    top_parties(&stats.receivers, stats.total_ctes)
}

fn top_parties(parties: &BTreeMap<String, PartyStats>, total: usize) -> Vec<RankEntry> {
    let entries = parties
        .iter()
        .map(|(name, p)| RankEntry {
            name: name.clone(),
            count: p.count,
            valor: Some(p.valor),
            delays: None,
            share: share_percent(p.count, total),
        })
        .collect();
    rank(entries, Some(TOP_N))
}

/// Alert ticker: the alert list repeated three times, cut to 30 entries.
pub fn ticker(alerts: &[Alert]) -> Vec<&Alert> {
    alerts
        .iter()
        .cycle()
        .take((alerts.len() * TICKER_REPEAT).min(TICKER_LEN))
        .collect()
}

/// Everything shown for a single shipment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentDetail {
    pub cte: String,
    pub sender: String,
    pub receiver: String,
    /// Declared value as currency.
    pub value: String,
    pub origin: String,
    pub destination: String,
    pub emission_date: String,
    pub weight: String,
    pub volumes: String,
    pub carrier: String,
    pub documents: Vec<String>,
    pub last_status: String,
    pub deadline: String,
    pub perishable_status: String,
    pub perishable_limit: String,
    pub delivered: bool,
    pub late: bool,
    pub expired: bool,
    pub at_risk: bool,
}

impl ShipmentDetail {
    pub fn new(shipment: &ClassifiedShipment) -> Self {
        let r = &shipment.record;
        let cls = &shipment.classification;
        let last_status = r.text(field::OCORRENCIA);

        ShipmentDetail {
            cte: non_blank(r.text(field::CTE), "N/A"),
            sender: sanitize(r.get(field::REMETENTE)),
            receiver: sanitize(r.get(field::DESTINATARIO)),
            value: format_brl(parse_numeric(r.get(field::VALOR_NF))),
            origin: sanitize(r.get(field::CIDADE_ORIGEM)),
            destination: sanitize(r.get(field::CIDADE_DESTINO)),
            emission_date: format_display_date(r.get(field::DATA_EMISSAO)),
            weight: format!("{} KG", r.text(field::PESO)),
            volumes: r.text(field::VOLUMES),
            carrier: r.text(field::CIA_TRANSF),
            documents: split_documents(r),
            last_status: non_blank(last_status, "SEM INFORMAÇÃO"),
            deadline: format_display_datetime(r.get(field::PREV_ENTREGA), "NÃO INFORMADA"),
            perishable_status: r.text(field::STATUS_PERECIVEL),
            perishable_limit: format_display_datetime(r.get(field::DATA_STATUS), "N/A"),
            delivered: cls.delivered,
            late: cls.late,
            expired: cls.expired,
            at_risk: cls.at_risk,
        }
    }
}

fn non_blank(s: String, fallback: &str) -> String {
    if s.trim().is_empty() {
        fallback.to_string()
    } else {
        s
    }
}

/// Linked documents: one leading quote stripped, split on commas, trimmed,
/// empties dropped.
pub fn split_documents(record: &Shipment) -> Vec<String> {
    let raw = record.text(field::DOCUMENTOS);
    let unquoted = raw
        .strip_prefix(['\'', '"'])
        .unwrap_or(raw.as_str());
    unquoted
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}
