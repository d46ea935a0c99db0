//! Collaborator traits for the decision pipeline.
//!
//! The engine itself is pure. Everything that talks to the outside world is
//! injected through one of these traits:
//!
//! - `RuleEvaluator`     — produces the decision token, matched rules, and trace
//! - `MeasurementSource` — supplies the NDVI score for a financed asset
//! - `AuditWriter`       — records every applied decision immutably
//!
//! How rules are authored or stored is up to the `RuleEvaluator`
//! implementation; the engine only sees its output.

use serde_json::Value;

use covenant_contracts::{
    audit::DecisionAuditEntry,
    decision::{DecisionRecord, PolicyEvaluation},
    error::CovenantResult,
};

/// Evaluates policy rules against a transaction.
pub trait RuleEvaluator: Send + Sync {
    /// Produce a decision for `record` given the current transaction document.
    ///
    /// The returned `decision` text is validated by the state machine; an
    /// evaluator does not need to know which transitions are legal.
    fn evaluate(&self, record: &DecisionRecord, document: &Value) -> CovenantResult<PolicyEvaluation>;
}

/// Supplies compliance measurements, e.g. a remote-sensing verification feed.
pub trait MeasurementSource: Send + Sync {
    /// The latest NDVI score for the asset behind `transaction_id`, or `None`
    /// if no measurement exists yet.
    fn ndvi_score(&self, transaction_id: &str) -> CovenantResult<Option<f64>>;
}

/// The audit sink for applied decisions.
///
/// A failed write is fatal: the facade returns `AuditWriteFailed` and the
/// caller receives no outcome to persist.
pub trait AuditWriter: Send + Sync {
    /// Append one entry. Implementations must treat this as append-only.
    ///
    /// `closes_transaction` is set when the entry moves the decision into a
    /// terminal state. The entry is then stored and the transaction closed in
    /// one step: on error neither has happened.
    fn write(&self, entry: &DecisionAuditEntry, closes_transaction: bool) -> CovenantResult<()>;
}
