//! # covenant-finance
//!
//! Pure calculators that turn a covenant-compliance measurement into a
//! basis-point spread adjustment and its monetary consequence.
//!
//! Nothing here performs I/O or holds state; every function is a
//! deterministic function of its arguments and may be called from any
//! thread. Inputs are not range-checked.

pub mod impact;
pub mod money;
pub mod ratchet;
pub mod schedule;

pub use impact::calculate_breach_impact;
pub use ratchet::{
    calculate_margin_ratchet, calculate_margin_ratchet_with_defaults, classify, ratchet_for_terms,
};
pub use schedule::generate_spread_schedule_cdm;
