//! Error types for the covenant decision engine.
//!
//! Every fallible operation in the workspace returns `CovenantResult<T>`.
//! `InvalidDecision` and `IllegalTransition` are kept as separate variants so
//! callers can tell bad input apart from a business-rule violation.

use thiserror::Error;

use crate::decision::PolicyDecisionState;

/// The unified error type for the covenant engine.
#[derive(Debug, Error)]
pub enum CovenantError {
    /// The decision token was not one of `ALLOW`, `BLOCK` or `FLAG`.
    #[error("invalid decision '{token}': expected one of ALLOW, BLOCK, FLAG")]
    InvalidDecision { token: String },

    /// The transition table forbids moving from `from` to `to`.
    ///
    /// Raised for any move out of a terminal state and for self-loops.
    #[error("illegal transition from {from} to {to}")]
    IllegalTransition {
        from: PolicyDecisionState,
        to: PolicyDecisionState,
    },

    /// Facility terms or another configuration input is missing or malformed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The audit sink could not persist a decision entry.
    ///
    /// Fatal for the facade: a decision that cannot be audited is not returned.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// A result bundle could not be converted into a document subtree.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// The measurement source failed to produce a compliance score.
    #[error("measurement unavailable for transaction '{transaction_id}': {reason}")]
    MeasurementUnavailable {
        transaction_id: String,
        reason: String,
    },

    /// The external rule evaluator failed before producing a decision.
    #[error("rule evaluation failed: {reason}")]
    RuleEvaluation { reason: String },
}

impl From<serde_json::Error> for CovenantError {
    fn from(e: serde_json::Error) -> Self {
        CovenantError::Serialization {
            reason: e.to_string(),
        }
    }
}

/// Convenience alias used throughout the covenant crates.
pub type CovenantResult<T> = Result<T, CovenantError>;
