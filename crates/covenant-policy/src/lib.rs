//! # covenant-policy
//!
//! The single authoritative rulebook for policy-decision transitions, plus
//! the TOML loader for per-facility terms.
//!
//! ## Overview
//!
//! Policy decisions gate financial transactions. Every transition is checked
//! against a small closed table before it is applied; anything the table
//! does not list is rejected with `IllegalTransition`, and a token that is
//! not `ALLOW`/`BLOCK`/`FLAG` is rejected with `InvalidDecision`.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use covenant_contracts::decision::PolicyDecisionState;
//! use covenant_policy::apply_decision;
//!
//! let next = apply_decision(PolicyDecisionState::Pending, "flag")?;
//! assert_eq!(next, PolicyDecisionState::Flagged);
//! ```

pub mod state_machine;
pub mod terms;

pub use state_machine::{
    apply_decision, apply_to_record, can_transition, can_transition_named, get_valid_transitions,
    get_valid_transitions_named, valid_transitions,
};

// ── Tests ─────────────────────────────────────────────────────────────────────
