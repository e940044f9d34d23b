use chrono::NaiveDateTime;

use crate::classify::outcome::{AlertReason, Classification};
use crate::model::{field, Cell, Shipment};
use crate::parsing::dates::parse_deadline;
use crate::parsing::normalize::{sanitize, sanitize_or};
use crate::rules::schema::RuleSetDef;

/// Classifies shipments against a ruleset at a fixed reference instant.
///
/// Keyword matching is case-insensitive: keywords are uppercased once here
/// and matched against uppercased field text.
#[derive(Debug, Clone)]
pub struct Classifier {
    now: NaiveDateTime,
    delivered_keywords: Vec<String>,
    finalized_status_keywords: Vec<String>,
    expired_keyword: String,
    not_expired_markers: Vec<String>,
    risk_keyword: String,
    /// Occurrence assumed when the record has none.
    occurrence_default: String,
}

impl Classifier {
    pub fn new(rules: &RuleSetDef, now: NaiveDateTime) -> Self {
        let upper_all = |list: &[String]| list.iter().map(|k| k.to_uppercase()).collect();
        Self {
            now,
            delivered_keywords: upper_all(&rules.delivered_keywords),
            finalized_status_keywords: upper_all(&rules.finalized_status_keywords),
            expired_keyword: rules.expired_keyword.to_uppercase(),
            not_expired_markers: upper_all(&rules.not_expired_markers),
            risk_keyword: rules.risk_keyword.to_uppercase(),
            occurrence_default: rules.defaults.occurrence.clone(),
        }
    }

    /// A finalized perishable status, or an occurrence with any
    /// delivery-completion keyword, means delivered.
    pub fn is_delivered(&self, occurrence: &str, perishable: &str) -> bool {
        let status = perishable.to_uppercase();
        if self
            .finalized_status_keywords
            .iter()
            .any(|k| status.contains(k.as_str()))
        {
            return true;
        }
        let occ = occurrence.to_uppercase();
        self.delivered_keywords
            .iter()
            .any(|k| occ.contains(k.as_str()))
    }

    /// True when the promised delivery time has passed.
    ///
    /// Delivered shipments and missing deadlines are never late. A deadline
    /// that cannot be parsed is treated as not late.
    pub fn is_late_deadline(
        &self,
        deadline: Option<&Cell>,
        occurrence: &str,
        perishable: &str,
    ) -> bool {
        if self.is_delivered(occurrence, perishable) {
            return false;
        }
        let Some(cell) = deadline.filter(|c| c.is_truthy()) else {
            return false;
        };

        let raw = cell.to_text();
        match parse_deadline(&raw) {
            Some(deadline) => self.now > deadline,
            None => {
                tracing::debug!(value = %raw, "unparseable delivery deadline; treated as not late");
                false
            }
        }
    }

    pub fn is_truly_expired(&self, perishable: &str, occurrence: &str) -> bool {
        if self.is_delivered(occurrence, perishable) {
            return false;
        }
        let s = perishable.to_uppercase();
        s.contains(self.expired_keyword.as_str())
            && !self
                .not_expired_markers
                .iter()
                .any(|m| s.contains(m.as_str()))
    }

    /// Status mentions an hours-based countdown.
    pub fn mentions_countdown(&self, perishable: &str) -> bool {
        perishable
            .to_uppercase()
            .contains(self.risk_keyword.as_str())
    }

    /// Priority-ordered alert reason.
    pub fn alert_reason(&self, late: bool, expired: bool, perishable: &str) -> AlertReason {
        match (late, expired) {
            (true, true) => AlertReason::LateAndExpired,
            (false, true) => AlertReason::Expired,
            (true, false) => AlertReason::Late,
            (false, false) if self.mentions_countdown(perishable) => AlertReason::ExpiryRisk,
            (false, false) => AlertReason::InFlow,
        }
    }

    /// Classify a record from its occurrence, perishable status and
    /// promised delivery fields. A blank occurrence reads as the
    /// ruleset's default occurrence, the same key the aggregator groups on.
    pub fn classify(&self, shipment: &Shipment) -> Classification {
        let occurrence = sanitize_or(shipment.get(field::OCORRENCIA), &self.occurrence_default);
        let perishable = sanitize(shipment.get(field::STATUS_PERECIVEL));
        self.classify_parts(shipment.get(field::PREV_ENTREGA), &occurrence, &perishable)
    }

    pub fn classify_parts(
        &self,
        deadline: Option<&Cell>,
        occurrence: &str,
        perishable: &str,
    ) -> Classification {
        let delivered = self.is_delivered(occurrence, perishable);
        let late = self.is_late_deadline(deadline, occurrence, perishable);
        let expired = self.is_truly_expired(perishable, occurrence);
        let at_risk = !delivered && self.mentions_countdown(perishable);

        Classification {
            delivered,
            late,
            expired,
            at_risk,
            reason: self.alert_reason(late, expired, perishable),
        }
    }
}
