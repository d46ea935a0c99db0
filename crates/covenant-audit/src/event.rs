//! Audit event and log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use covenant_contracts::audit::DecisionAuditEntry;

/// One link in the hash chain.
///
/// Modifying any field, including those of the embedded `entry`, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The ledger (usually one facility) this chain belongs to.
    pub ledger_id: String,

    pub entry: DecisionAuditEntry,

    /// `this_hash` of the previous event, or `GENESIS_HASH`.
    pub prev_hash: String,

    pub this_hash: String,
}

impl AuditEvent {
    /// The `prev_hash` of the first event in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";

    pub fn transaction_id(&self) -> &str {
        &self.entry.transaction_id
    }
}

/// A sealed export of a ledger.
///
/// `terminal_hash` is the `this_hash` of the last event and commits to the
/// whole log. Empty when no event was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub ledger_id: String,
    pub events: Vec<AuditEvent>,
    /// Transactions whose decision reached a terminal state, in closing order.
    pub closed_transactions: Vec<String>,
    pub finalized_at: DateTime<Utc>,
    pub terminal_hash: String,
}
