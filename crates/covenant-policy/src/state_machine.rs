//! The decision transition table and the operations that enforce it.
//!
//! ```text
//! PENDING ──ALLOW──▶ ALLOWED   (terminal)
//!    │  └───BLOCK──▶ BLOCKED   (terminal)
//!    └──FLAG──▶ FLAGGED ──ALLOW──▶ ALLOWED
//!                  └─────BLOCK──▶ BLOCKED
//! ```
//!
//! There are no self-loops. Once a decision is ALLOWED or BLOCKED it is
//! closed: a blocked transaction cannot be re-approved and an approved one
//! cannot be re-decided.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use covenant_contracts::{
    decision::{DecisionRecord, DecisionToken, PolicyDecisionState},
    error::{CovenantError, CovenantResult},
};

/// The table row for `from`.
pub fn valid_transitions(from: PolicyDecisionState) -> &'static [PolicyDecisionState] {
    use PolicyDecisionState::*;
    match from {
        Pending => &[Allowed, Blocked, Flagged],
        Flagged => &[Allowed, Blocked],
        Allowed | Blocked => &[],
    }
}

pub fn can_transition(from: PolicyDecisionState, to: PolicyDecisionState) -> bool {
    valid_transitions(from).contains(&to)
}

/// `can_transition` over persisted state names. An unknown name on either
/// side yields `false`.
pub fn can_transition_named(from: &str, to: &str) -> bool {
    match (PolicyDecisionState::parse(from), PolicyDecisionState::parse(to)) {
        (Some(from), Some(to)) => can_transition(from, to),
        _ => false,
    }
}

/// The set of states reachable in one step from `current`.
pub fn get_valid_transitions(current: PolicyDecisionState) -> BTreeSet<PolicyDecisionState> {
    valid_transitions(current).iter().copied().collect()
}

/// `get_valid_transitions` over a persisted state name; unknown names get an
/// empty set.
pub fn get_valid_transitions_named(current: &str) -> BTreeSet<PolicyDecisionState> {
    PolicyDecisionState::parse(current)
        .map(get_valid_transitions)
        .unwrap_or_default()
}

/// Validate `decision_text` against `current_state` and return the new state.
///
/// The token is checked first, so an unrecognized token is always reported
/// as `InvalidDecision` even from a terminal state. Nothing is mutated; the
/// caller persists the returned state.
pub fn apply_decision(
    current_state: PolicyDecisionState,
    decision_text: &str,
) -> CovenantResult<PolicyDecisionState> {
    resolve(current_state, decision_text).map(|(_, target)| target)
}

/// Apply `decision_text` to `record` in place.
///
/// On error the record is left exactly as it was.
pub fn apply_to_record(
    record: &mut DecisionRecord,
    decision_text: &str,
) -> CovenantResult<PolicyDecisionState> {
    let (token, next) = resolve(record.current_state, decision_text)?;
    record.decision_input = Some(token);
    record.current_state = next;
    Ok(next)
}

fn resolve(
    current_state: PolicyDecisionState,
    decision_text: &str,
) -> CovenantResult<(DecisionToken, PolicyDecisionState)> {
    let token = match decision_text.parse::<DecisionToken>() {
        Ok(token) => token,
        Err(e) => {
            warn!(
                current_state = %current_state,
                decision = %decision_text,
                "unrecognized decision token"
            );
            return Err(e);
        }
    };

    let target = token.target_state();
    if !can_transition(current_state, target) {
        warn!(
            from = %current_state,
            to = %target,
            decision = %token,
            "transition rejected by decision table"
        );
        return Err(CovenantError::IllegalTransition {
            from: current_state,
            to: target,
        });
    }

    debug!(from = %current_state, to = %target, decision = %token, "decision applied");
    Ok((token, target))
}
