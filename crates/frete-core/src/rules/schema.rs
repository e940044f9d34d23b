use serde::{Deserialize, Serialize};

/// Keyword rules used to classify shipments, plus the labels and fallback
/// group names shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Occurrence keywords meaning the delivery is complete.
    pub delivered_keywords: Vec<String>,
    /// Perishable-status keywords meaning the shipment is closed.
    pub finalized_status_keywords: Vec<String>,
    /// Perishable-status keyword marking expired cargo.
    pub expired_keyword: String,
    /// Markers that cancel `expired_keyword` (e.g. "NAO VENCIDO").
    pub not_expired_markers: Vec<String>,
    /// Perishable-status keyword for an hours-based expiry countdown.
    pub risk_keyword: String,
    /// Occurrences counted in the aggregate but left out of rankings.
    #[serde(default)]
    pub hidden_occurrences: Vec<String>,
    #[serde(default)]
    pub defaults: GroupDefaults,
    #[serde(default)]
    pub labels: AlertLabels,
}

/// Group names used when the source field is blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupDefaults {
    pub carrier: String,
    /// Used for both sender (client) and receiver.
    pub party: String,
    pub occurrence: String,
}

impl Default for GroupDefaults {
    fn default() -> Self {
        Self {
            carrier: "PRÓPRIO".into(),
            party: "NÃO INFORMADO".into(),
            occurrence: "SEM OCORRÊNCIA".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertLabels {
    pub late_and_expired: String,
    pub expired: String,
    pub late: String,
    pub expiry_risk: String,
    pub in_flow: String,
}

impl Default for AlertLabels {
    fn default() -> Self {
        Self {
            late_and_expired: "ATRASO + VENCIMENTO".into(),
            expired: "PERECÍVEL VENCIDO".into(),
            late: "PRAZO EXCEDIDO".into(),
            expiry_risk: "RISCO VENCIMENTO".into(),
            in_flow: "EM FLUXO".into(),
        }
    }
}
