//! Hashing and chain verification.
//!
//! Hash input layout (bytes, in order):
//!   1. ledger_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the audit entry

use sha2::{Digest, Sha256};

use covenant_contracts::{audit::DecisionAuditEntry, error::CovenantResult};

use crate::event::AuditEvent;

/// SHA-256 over one event's position, link, and entry. Lowercase hex.
pub fn hash_event(
    ledger_id: &str,
    sequence: u64,
    entry: &DecisionAuditEntry,
    prev_hash: &str,
) -> CovenantResult<String> {
    let entry_json = serde_json::to_vec(entry)?;

    let mut hasher = Sha256::new();
    hasher.update(ledger_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&entry_json);

    Ok(hex::encode(hasher.finalize()))
}

/// `true` when every event links to its predecessor (or to
/// `GENESIS_HASH` for the first) and its stored hash matches a recomputation.
///
/// An empty chain is valid. An entry that can no longer be serialized counts
/// as a broken chain.
pub fn verify_chain(events: &[AuditEvent]) -> bool {
    let mut expected_prev = AuditEvent::GENESIS_HASH.to_string();

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return false;
        }

        match hash_event(&event.ledger_id, event.sequence, &event.entry, &event.prev_hash) {
            Ok(recomputed) if recomputed == event.this_hash => {}
            _ => return false,
        }

        expected_prev = event.this_hash.clone();
    }

    true
}
