//! Scenario 2: Bypass Attempt
//!
//! A peatland facility is blocked after two failed checks. The borrower then
//! submits a remediation report with a strong reading and asks for the block
//! to be lifted.
//!
//! Sub-case A — evaluator answers ALLOW from BLOCKED  → IllegalTransition
//! Sub-case B — manual override with token "APPROVE"  → InvalidDecision
//!
//! Neither attempt may touch the document, compute a ratchet, or reach the
//! audit ledger.

use std::collections::BTreeSet;

use serde_json::Value;

use covenant_audit::InMemoryAuditWriter;
use covenant_contracts::{
    decision::{DecisionRecord, PolicyEvaluation},
    error::{CovenantError, CovenantResult},
};
use covenant_core::{traits::RuleEvaluator, DecisionApplicator};

use crate::{
    evaluator::NdviThresholdEvaluator,
    mock_data::{deal_document, with_reading, MockNdviFeed},
};

const SUMATRA_TERMS: &str = include_str!("../../policies/sumatra-peatland.toml");

const DEAL_ID: &str = "SLL-IDN-2025-007";
const TRANSACTION_ID: &str = "SLL-IDN-2025-007:tranche-B";

/// An operator console that forwards whatever the operator typed.
struct ManualOverride {
    typed: String,
}

impl RuleEvaluator for ManualOverride {
    fn evaluate(&self, _record: &DecisionRecord, _document: &Value) -> CovenantResult<PolicyEvaluation> {
        Ok(PolicyEvaluation {
            decision: self.typed.clone(),
            matched_rules: BTreeSet::from(["manual-override".to_string()]),
            trace: vec![],
        })
    }
}

/// Run Scenario 2: a closed decision cannot be reopened.
pub fn run_scenario() -> CovenantResult<()> {
    println!("=== Scenario 2: Bypass Attempt ===");
    println!();

    let terms = covenant_policy::terms::from_toml_str(SUMATRA_TERMS)?;
    let audit = InMemoryAuditWriter::new(DEAL_ID);
    let feed = MockNdviFeed::new();
    let evaluator = NdviThresholdEvaluator::for_terms(&terms);
    let applicator = DecisionApplicator::new(terms, Box::new(audit.clone()));

    // ── Setup: drive the transaction to BLOCKED ──────────────────────────────

    println!("  Setup: two failed checks (NDVI 0.58, then 0.52 against SPT 0.75)");
    let mut record = DecisionRecord::new(TRANSACTION_ID);
    let mut document = deal_document(DEAL_ID);
    for (ndvi, period) in [(0.58, "2025-Q1"), (0.52, "2025-Q2")] {
        feed.publish(TRANSACTION_ID, ndvi)?;
        let input = with_reading(&document, ndvi, period);
        let outcome = applicator.evaluate_and_apply(&evaluator, &feed, &record, &input)?;
        println!(
            "    {}: {} → {}",
            period, record.current_state, outcome.record.current_state
        );
        record = outcome.record;
        document = outcome.document;
    }
    let events_before = audit.export_log()?.events.len();
    println!("  Audit events so far:    {}", events_before);
    println!();

    // ── Sub-case A: remediation reading, evaluator says ALLOW ────────────────

    {
        println!("  Sub-case A: remediation report shows NDVI 0.91");
        feed.publish(TRANSACTION_ID, 0.91)?;
        let input = with_reading(&document, 0.91, "2025-Q3-remediation");

        match applicator.evaluate_and_apply(&evaluator, &feed, &record, &input) {
            Err(CovenantError::IllegalTransition { from, to }) => {
                println!("  Evaluator decision:     ALLOW");
                println!("  Transition {} → {}:  REJECTED", from, to);
                println!("  RESULT: IllegalTransition (expected)");
            }
            Err(e) => println!("  Unexpected error: {}", e),
            Ok(outcome) => println!(
                "  Unexpectedly succeeded: now {}",
                outcome.record.current_state
            ),
        }
        println!();
    }

    // ── Sub-case B: operator types a token the engine does not know ──────────

    {
        println!("  Sub-case B: operator override with token \"APPROVE\"");
        let console = ManualOverride { typed: "APPROVE".to_string() };

        match applicator.evaluate_and_apply(&console, &feed, &record, &document) {
            Err(CovenantError::InvalidDecision { token }) => {
                println!("  Token '{}':          REJECTED", token);
                println!("  RESULT: InvalidDecision (expected)");
            }
            Err(e) => println!("  Unexpected error: {}", e),
            Ok(outcome) => println!(
                "  Unexpectedly succeeded: now {}",
                outcome.record.current_state
            ),
        }
        println!();
    }

    let log = audit.export_log()?;
    println!(
        "  Audit chain integrity:  {} ({} event(s), {} added by bypass attempts)",
        if audit.verify_integrity() { "VERIFIED" } else { "FAILED" },
        log.events.len(),
        log.events.len() - events_before
    );
    println!("  Record state:           {}", record.current_state);
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
