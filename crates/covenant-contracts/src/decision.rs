//! Decision state, decision tokens, and the in-memory decision record.
//!
//! These types are the vocabulary of the policy state machine. The transition
//! table itself lives in `covenant-policy`; this module only defines the data.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CovenantError;

/// Unique identifier for one applied decision, carried into every audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionId(pub uuid::Uuid);

impl DecisionId {
    /// Create a new, unique decision ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for DecisionId {
    fn default() -> Self {
        Self::new()
    }
}

/// The lifecycle state of a policy decision on a financial transaction.
///
/// `Allowed` and `Blocked` are terminal. `Flagged` is a review hold that can
/// still resolve either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyDecisionState {
    Pending,
    Allowed,
    Blocked,
    Flagged,
}

impl PolicyDecisionState {
    /// All four states, in declaration order.
    pub const ALL: [PolicyDecisionState; 4] = [
        PolicyDecisionState::Pending,
        PolicyDecisionState::Allowed,
        PolicyDecisionState::Blocked,
        PolicyDecisionState::Flagged,
    ];

    /// The canonical upper-case name persisted by external stores.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Allowed => "ALLOWED",
            Self::Blocked => "BLOCKED",
            Self::Flagged => "FLAGGED",
        }
    }

    /// Parse a persisted state name, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything that is not one of the four names.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for PolicyDecisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decision emitted by the rule evaluator: `ALLOW`, `BLOCK` or `FLAG`.
///
/// Parsing accepts any letter case and ignores leading or trailing
/// whitespace, so `" block\n"` from a padded form field or a file line is
/// `Block`. Anything else between the ends, including inner spaces, is
/// rejected with `InvalidDecision` carrying the input as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionToken {
    Allow,
    Block,
    Flag,
}

impl DecisionToken {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "ALLOW",
            Self::Block => "BLOCK",
            Self::Flag => "FLAG",
        }
    }

    /// The state this decision moves a record into.
    pub fn target_state(self) -> PolicyDecisionState {
        match self {
            Self::Allow => PolicyDecisionState::Allowed,
            Self::Block => PolicyDecisionState::Blocked,
            Self::Flag => PolicyDecisionState::Flagged,
        }
    }
}

impl fmt::Display for DecisionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionToken {
    type Err = CovenantError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        [Self::Allow, Self::Block, Self::Flag]
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CovenantError::InvalidDecision {
                token: s.to_string(),
            })
    }
}

/// The in-memory decision record for one transaction.
///
/// Storage is owned by the caller. `current_state` must only change through
/// the state machine in `covenant-policy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub transaction_id: String,
    pub current_state: PolicyDecisionState,
    /// The last decision successfully applied, if any.
    pub decision_input: Option<DecisionToken>,
    /// Ordered rule-evaluation steps. Opaque to the engine.
    pub trace: Vec<serde_json::Value>,
    pub matched_rules: BTreeSet<String>,
}

impl DecisionRecord {
    /// A fresh record in `PENDING` with no trace.
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            current_state: PolicyDecisionState::Pending,
            decision_input: None,
            trace: Vec::new(),
            matched_rules: BTreeSet::new(),
        }
    }
}

/// What the external rule evaluator hands to the engine.
///
/// `decision` is the raw token text; it is validated by the state machine,
/// not here, so an evaluator emitting garbage surfaces as `InvalidDecision`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEvaluation {
    pub decision: String,
    #[serde(default)]
    pub matched_rules: BTreeSet<String>,
    #[serde(default)]
    pub trace: Vec<serde_json::Value>,
}
