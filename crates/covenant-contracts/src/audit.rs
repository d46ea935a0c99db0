//! The audit entry written once per applied decision.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    decision::{DecisionId, DecisionToken, PolicyDecisionState},
    ratchet::{ComplianceClassification, MarginRatchetResult},
};

/// Condensed ratchet outcome kept in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatchetSummary {
    pub classification: ComplianceClassification,
    pub ndvi_score: f64,
    pub penalty_bps: i64,
    pub new_spread_bps: i64,
    pub annual_impact: f64,
}

impl From<&MarginRatchetResult> for RatchetSummary {
    fn from(r: &MarginRatchetResult) -> Self {
        Self {
            classification: r.classification,
            ndvi_score: r.ndvi_score,
            penalty_bps: r.penalty_bps,
            new_spread_bps: r.new_spread_bps,
            annual_impact: r.annual_impact,
        }
    }
}

/// An immutable record of one successful decision transition.
///
/// Rejected decisions never produce an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionAuditEntry {
    pub decision_id: DecisionId,
    pub transaction_id: String,
    pub from_state: PolicyDecisionState,
    pub to_state: PolicyDecisionState,
    pub decision: DecisionToken,
    pub matched_rules: BTreeSet<String>,
    pub trace: Vec<serde_json::Value>,
    pub ratchet: Option<RatchetSummary>,
    pub timestamp: DateTime<Utc>,
}
