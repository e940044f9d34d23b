use serde::{Deserialize, Serialize};

use crate::rules::schema::AlertLabels;

/// Why a shipment shows up (or not) on the priority list, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertReason {
    LateAndExpired,
    Expired,
    Late,
    ExpiryRisk,
    InFlow,
}

impl AlertReason {
    pub fn label<'a>(&self, labels: &'a AlertLabels) -> &'a str {
        match self {
            AlertReason::LateAndExpired => &labels.late_and_expired,
            AlertReason::Expired => &labels.expired,
            AlertReason::Late => &labels.late,
            AlertReason::ExpiryRisk => &labels.expiry_risk,
            AlertReason::InFlow => &labels.in_flow,
        }
    }
}

/// Status of one shipment, computed once against a fixed reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub delivered: bool,
    /// Promised delivery time has passed and the shipment is not delivered.
    pub late: bool,
    /// Perishable cargo marked expired and not delivered.
    pub expired: bool,
    /// Perishable status shows an hours-based countdown, not delivered.
    pub at_risk: bool,
    pub reason: AlertReason,
}

impl Classification {
    /// On time means "not late", delivered or still in transit.
    pub fn on_time(&self) -> bool {
        !self.late
    }

    pub fn urgent(&self) -> bool {
        self.late || self.expired
    }

    pub fn needs_alert(&self) -> bool {
        self.late || self.expired || self.at_risk
    }
}
