//! # covenant-contracts
//!
//! Shared types and the error taxonomy for the covenant decision engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate: only data definitions, parsing of wire tokens, and error types.

pub mod audit;
pub mod decision;
pub mod error;
pub mod ratchet;
pub mod terms;
