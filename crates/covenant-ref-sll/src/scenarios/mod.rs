//! Sustainability-linked loan demo scenarios.
//!
//! Each scenario wires the real engine components (terms loader, applicator,
//! hash-chained audit ledger) to mock deal data and a mock NDVI feed.

pub mod bypass_attempt;
pub mod discount;
pub mod ratchet_breach;
