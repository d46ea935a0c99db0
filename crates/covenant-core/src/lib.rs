//! # covenant-core
//!
//! The decision application facade and the traits it is built on.
//!
//! `DecisionApplicator` ties the pieces together: the transition table from
//! `covenant-policy`, the calculators from `covenant-finance`, the document
//! accessor from `covenant-record`, and an injected `AuditWriter`. Rule
//! evaluation and measurement fetching are supplied by the caller through
//! `RuleEvaluator` and `MeasurementSource`.

pub mod applicator;
pub mod traits;

pub use applicator::{DecisionApplicator, DecisionOutcome};
