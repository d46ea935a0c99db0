//! In-memory implementation of `AuditWriter`.
//!
//! All transactions on one ledger share a single chain, so the relative order
//! of decisions across transactions is itself tamper-evident.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use covenant_contracts::{
    audit::DecisionAuditEntry,
    error::{CovenantError, CovenantResult},
};
use covenant_core::traits::AuditWriter;

use crate::{
    chain::{hash_event, verify_chain},
    event::{AuditEvent, AuditLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct InMemoryState {
    pub(crate) events: Vec<AuditEvent>,

    /// The next sequence number to assign.
    pub(crate) sequence: u64,

    /// `this_hash` of the last event, or `GENESIS_HASH`.
    pub(crate) last_hash: String,

    pub(crate) closed: Vec<String>,
}

// ── Public writer ─────────────────────────────────────────────────────────────

/// An append-only audit writer backed by a SHA-256 hash chain.
///
/// A write flagged as closing its transaction stores the entry and closes the
/// transaction under one lock. Further entries for a closed transaction are
/// refused with `AuditWriteFailed`. Clones share the same chain.
#[derive(Clone)]
pub struct InMemoryAuditWriter {
    ledger_id: String,
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryAuditWriter {
    pub fn new(ledger_id: impl Into<String>) -> Self {
        let state = InMemoryState {
            events: Vec::new(),
            sequence: 0,
            last_hash: AuditEvent::GENESIS_HASH.to_string(),
            closed: Vec::new(),
        };
        Self {
            ledger_id: ledger_id.into(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn ledger_id(&self) -> &str {
        &self.ledger_id
    }

    fn lock(&self) -> CovenantResult<MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| CovenantError::AuditWriteFailed {
            reason: format!("audit state lock poisoned: {}", e),
        })
    }

    /// A sealed copy of everything written so far.
    pub fn export_log(&self) -> CovenantResult<AuditLog> {
        let state = self.lock()?;
        let terminal_hash = state
            .events
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        Ok(AuditLog {
            ledger_id: self.ledger_id.clone(),
            events: state.events.clone(),
            closed_transactions: state.closed.clone(),
            finalized_at: Utc::now(),
            terminal_hash,
        })
    }

    /// Entries for one transaction, in the order they were written.
    pub fn entries_for(&self, transaction_id: &str) -> CovenantResult<Vec<DecisionAuditEntry>> {
        let state = self.lock()?;
        Ok(state
            .events
            .iter()
            .filter(|e| e.transaction_id() == transaction_id)
            .map(|e| e.entry.clone())
            .collect())
    }

    pub fn is_closed(&self, transaction_id: &str) -> CovenantResult<bool> {
        Ok(self.lock()?.closed.iter().any(|t| t == transaction_id))
    }

    /// `false` if any stored event was altered after it was written.
    /// A poisoned lock also reports `false`.
    pub fn verify_integrity(&self) -> bool {
        match self.state.lock() {
            Ok(state) => verify_chain(&state.events),
            Err(_) => false,
        }
    }
}

// ── AuditWriter impl ──────────────────────────────────────────────────────────

impl AuditWriter for InMemoryAuditWriter {
    fn write(&self, entry: &DecisionAuditEntry, closes_transaction: bool) -> CovenantResult<()> {
        let mut state = self.lock()?;

        if state.closed.iter().any(|t| *t == entry.transaction_id) {
            warn!(
                ledger_id = %self.ledger_id,
                transaction_id = %entry.transaction_id,
                "refusing audit entry for a closed transaction"
            );
            return Err(CovenantError::AuditWriteFailed {
                reason: format!("transaction '{}' is already closed", entry.transaction_id),
            });
        }

        let prev_hash = state.last_hash.clone();
        let sequence = state.sequence;
        let this_hash = hash_event(&self.ledger_id, sequence, entry, &prev_hash)?;

        debug!(
            ledger_id = %self.ledger_id,
            sequence,
            transaction_id = %entry.transaction_id,
            to_state = %entry.to_state,
            "audit entry appended"
        );

        state.events.push(AuditEvent {
            sequence,
            ledger_id: self.ledger_id.clone(),
            entry: entry.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.sequence += 1;
        state.last_hash = this_hash;

        if closes_transaction {
            state.closed.push(entry.transaction_id.clone());
            info!(
                ledger_id = %self.ledger_id,
                transaction_id = %entry.transaction_id,
                event_count = state.events.len(),
                terminal_hash = %state.last_hash,
                "transaction closed in audit log"
            );
        }

        Ok(())
    }
}
