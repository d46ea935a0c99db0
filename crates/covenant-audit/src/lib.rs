//! # covenant-audit
//!
//! Append-only, SHA-256 hash-chained audit trail for applied policy
//! decisions.
//!
//! Every `DecisionAuditEntry` the applicator writes is wrapped in an
//! `AuditEvent` that links to the previous event by hash. Altering any stored
//! event breaks the chain, and `verify_chain` reports it.
//!
//! ```rust,ignore
//! use covenant_audit::InMemoryAuditWriter;
//! use covenant_core::DecisionApplicator;
//!
//! let writer = InMemoryAuditWriter::new("facility-007");
//! let applicator = DecisionApplicator::new(terms, Box::new(writer.clone()));
//! applicator.apply(&record, &evaluation, Some(0.72), &document)?;
//!
//! assert!(writer.verify_integrity());
//! let log = writer.export_log()?;
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_event, verify_chain};
pub use event::{AuditEvent, AuditLog};
pub use memory::InMemoryAuditWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;
    use serde_json::json;

    use covenant_contracts::{
        audit::DecisionAuditEntry,
        decision::{DecisionId, DecisionRecord, DecisionToken, PolicyDecisionState, PolicyEvaluation},
        error::CovenantError,
        terms::FacilityTerms,
    };
    use covenant_core::{traits::AuditWriter, DecisionApplicator};

    use super::{AuditEvent, InMemoryAuditWriter};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn make_entry(transaction_id: &str, from: PolicyDecisionState, decision: DecisionToken) -> DecisionAuditEntry {
        DecisionAuditEntry {
            decision_id: DecisionId::new(),
            transaction_id: transaction_id.to_string(),
            from_state: from,
            to_state: decision.target_state(),
            decision,
            matched_rules: BTreeSet::from(["ndvi-threshold".to_string()]),
            trace: vec![json!({ "rule": "ndvi-threshold", "score": 0.71 })],
            ratchet: None,
            timestamp: Utc::now(),
        }
    }

    fn flag(transaction_id: &str) -> DecisionAuditEntry {
        make_entry(transaction_id, PolicyDecisionState::Pending, DecisionToken::Flag)
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_hash_chain_integrity() {
        let writer = InMemoryAuditWriter::new("ledger-integrity");
        writer.write(&flag("txn-a"), false).unwrap();
        writer.write(&flag("txn-b"), false).unwrap();
        writer
            .write(&make_entry("txn-a", PolicyDecisionState::Flagged, DecisionToken::Block), false)
            .unwrap();

        assert!(writer.verify_integrity(), "chain must be valid after sequential writes");
    }

    /// Rewriting a stored decision must be detected.
    #[test]
    fn test_tamper_detection() {
        let writer = InMemoryAuditWriter::new("ledger-tamper");
        writer.write(&flag("txn-a"), false).unwrap();
        writer
            .write(&make_entry("txn-a", PolicyDecisionState::Flagged, DecisionToken::Block), false)
            .unwrap();

        {
            let mut state = writer.state.lock().unwrap();
            // Pretend the block was an approval.
            state.events[1].entry.decision = DecisionToken::Allow;
            state.events[1].entry.to_state = PolicyDecisionState::Allowed;
        }

        assert!(!writer.verify_integrity(), "chain must detect a rewritten decision");
    }

    #[test]
    fn test_reorder_detection() {
        let writer = InMemoryAuditWriter::new("ledger-reorder");
        writer.write(&flag("txn-a"), false).unwrap();
        writer.write(&flag("txn-b"), false).unwrap();

        {
            let mut state = writer.state.lock().unwrap();
            state.events.swap(0, 1);
        }

        assert!(!writer.verify_integrity());
    }

    #[test]
    fn test_truncation_keeps_prefix_valid() {
        let writer = InMemoryAuditWriter::new("ledger-truncate");
        writer.write(&flag("txn-a"), false).unwrap();
        writer.write(&flag("txn-b"), false).unwrap();

        let log = writer.export_log().unwrap();
        // A prefix is still a valid chain; the terminal hash is what pins length.
        assert!(super::verify_chain(&log.events[..1]));
        assert_ne!(log.events[0].this_hash, log.terminal_hash);
    }

    #[test]
    fn test_genesis_hash() {
        let writer = InMemoryAuditWriter::new("ledger-genesis");
        writer.write(&flag("txn-a"), false).unwrap();

        let log = writer.export_log().unwrap();
        assert_eq!(log.events.len(), 1);
        assert_eq!(log.events[0].prev_hash, AuditEvent::GENESIS_HASH);
        assert_eq!(log.events[0].this_hash.len(), 64);
    }

    #[test]
    fn test_sequence_monotonic() {
        let writer = InMemoryAuditWriter::new("ledger-seq");
        for id in ["a", "b", "c"] {
            writer.write(&flag(id), false).unwrap();
        }

        let log = writer.export_log().unwrap();
        for (idx, event) in log.events.iter().enumerate() {
            assert_eq!(event.sequence, idx as u64);
        }
    }

    #[test]
    fn test_export_log() {
        let writer = InMemoryAuditWriter::new("ledger-export");
        writer.write(&flag("txn-a"), false).unwrap();
        writer
            .write(&make_entry("txn-b", PolicyDecisionState::Flagged, DecisionToken::Block), true)
            .unwrap();

        let log = writer.export_log().unwrap();

        assert_eq!(log.ledger_id, "ledger-export");
        assert_eq!(log.events.len(), 3);
        assert_eq!(log.terminal_hash, log.events.last().unwrap().this_hash);
        assert_eq!(log.closed_transactions, vec!["txn-b".to_string()]);
        assert!(super::verify_chain(&log.events));
    }

    #[test]
    fn test_verify_empty() {
        let writer = InMemoryAuditWriter::new("ledger-empty");
        assert!(writer.verify_integrity());
        assert!(super::verify_chain(&[]));
        assert_eq!(writer.export_log().unwrap().terminal_hash, "");
    }

    #[test]
    fn test_hash_depends_on_ledger() {
        let entry = flag("txn-a");
        let a = super::hash_event("ledger-1", 0, &entry, AuditEvent::GENESIS_HASH).unwrap();
        let b = super::hash_event("ledger-2", 0, &entry, AuditEvent::GENESIS_HASH).unwrap();
        let again = super::hash_event("ledger-1", 0, &entry, AuditEvent::GENESIS_HASH).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, again);
    }

    #[test]
    fn test_closed_transaction_refuses_writes() {
        let writer = InMemoryAuditWriter::new("ledger-closed");
        writer
            .write(&make_entry("txn-a", PolicyDecisionState::Pending, DecisionToken::Block), true)
            .unwrap();
        assert!(writer.is_closed("txn-a").unwrap());

        let result = writer.write(&flag("txn-a"), false);
        assert!(matches!(result, Err(CovenantError::AuditWriteFailed { .. })));
        let result = writer.write(
            &make_entry("txn-a", PolicyDecisionState::Flagged, DecisionToken::Block),
            true,
        );
        assert!(matches!(result, Err(CovenantError::AuditWriteFailed { .. })));

        // Other transactions on the ledger are unaffected.
        writer.write(&flag("txn-b"), false).unwrap();
        assert_eq!(writer.export_log().unwrap().events.len(), 2);
    }

    /// Closing happens in the same write as the entry: a refused closing
    /// write leaves both the chain and the closed set as they were.
    #[test]
    fn test_refused_closing_write_changes_nothing() {
        let writer = InMemoryAuditWriter::new("ledger-atomic");
        writer
            .write(&make_entry("txn-a", PolicyDecisionState::Pending, DecisionToken::Block), true)
            .unwrap();
        let before = writer.export_log().unwrap();

        let result = writer.write(
            &make_entry("txn-a", PolicyDecisionState::Blocked, DecisionToken::Block),
            true,
        );
        assert!(matches!(result, Err(CovenantError::AuditWriteFailed { .. })));

        let after = writer.export_log().unwrap();
        assert_eq!(after.events.len(), 1);
        assert_eq!(after.terminal_hash, before.terminal_hash);
        assert_eq!(after.closed_transactions, vec!["txn-a".to_string()]);
        assert!(writer.verify_integrity());
    }

    #[test]
    fn test_non_closing_write_leaves_transaction_open() {
        let writer = InMemoryAuditWriter::new("ledger-open");
        writer.write(&flag("txn-a"), false).unwrap();
        assert!(!writer.is_closed("txn-a").unwrap());
        writer.write(&flag("txn-a"), false).unwrap();
        assert!(writer.export_log().unwrap().closed_transactions.is_empty());
    }

    #[test]
    fn test_entries_for_filters_by_transaction() {
        let writer = InMemoryAuditWriter::new("ledger-filter");
        writer.write(&flag("txn-a"), false).unwrap();
        writer.write(&flag("txn-b"), false).unwrap();
        writer
            .write(&make_entry("txn-a", PolicyDecisionState::Flagged, DecisionToken::Allow), false)
            .unwrap();

        let entries = writer.entries_for("txn-a").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].decision, DecisionToken::Flag);
        assert_eq!(entries[1].decision, DecisionToken::Allow);
        assert!(writer.entries_for("txn-missing").unwrap().is_empty());
    }

    /// Applicator → writer end to end: flag, then block, then a rejected
    /// re-approval that must leave the chain untouched.
    #[test]
    fn test_applicator_writes_chain() {
        let writer = InMemoryAuditWriter::new("facility-007");
        let applicator = DecisionApplicator::new(
            FacilityTerms::sustainability_linked(10_000_000.0, 0.8),
            Box::new(writer.clone()),
        );

        let evaluation = |decision: &str| PolicyEvaluation {
            decision: decision.to_string(),
            matched_rules: BTreeSet::new(),
            trace: vec![],
        };

        let doc = json!({});
        let flagged = applicator
            .apply(&DecisionRecord::new("txn-1"), &evaluation("FLAG"), Some(0.72), &doc)
            .unwrap();
        let blocked = applicator
            .apply(&flagged.record, &evaluation("BLOCK"), Some(0.65), &flagged.document)
            .unwrap();
        let rejected = applicator.apply(&blocked.record, &evaluation("ALLOW"), None, &blocked.document);

        assert!(matches!(rejected, Err(CovenantError::IllegalTransition { .. })));

        let log = writer.export_log().unwrap();
        assert_eq!(log.events.len(), 2);
        assert_eq!(log.events[1].entry.to_state, PolicyDecisionState::Blocked);
        assert_eq!(log.events[1].entry.ratchet.as_ref().unwrap().penalty_bps, 25);
        assert_eq!(log.closed_transactions, vec!["txn-1".to_string()]);
        assert!(writer.verify_integrity());
    }
}
