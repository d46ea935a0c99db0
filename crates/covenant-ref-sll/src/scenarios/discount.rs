//! Scenario 3: Discount
//!
//! An agroforestry facility beats its target by more than the warning band.
//! The evaluator allows the drawdown and the margin ratchets down one step.
//! This facility keeps its decision and ratchet inside the covenant entry of
//! the deal document rather than at the default paths.

use covenant_audit::InMemoryAuditWriter;
use covenant_contracts::{decision::DecisionRecord, error::CovenantResult};
use covenant_core::DecisionApplicator;

use crate::{
    evaluator::NdviThresholdEvaluator,
    mock_data::{deal_document, with_reading, MockNdviFeed},
};

const RIFT_VALLEY_TERMS: &str = include_str!("../../policies/rift-valley-agroforestry.toml");

const DEAL_ID: &str = "SLL-KEN-2025-014";
const TRANSACTION_ID: &str = "SLL-KEN-2025-014:rcf-utilisation-11";

/// Run Scenario 3: outperformance earns a spread discount.
pub fn run_scenario() -> CovenantResult<()> {
    println!("=== Scenario 3: Discount ===");
    println!();

    let terms = covenant_policy::terms::from_toml_str(RIFT_VALLEY_TERMS)?;
    let audit = InMemoryAuditWriter::new(DEAL_ID);
    let feed = MockNdviFeed::new();
    let evaluator = NdviThresholdEvaluator::for_terms(&terms);
    let applicator = DecisionApplicator::new(terms.clone(), Box::new(audit.clone()));

    println!("  Deal:        {}", DEAL_ID);
    println!(
        "  Terms:       SPT {:.2}, base {} bps, step {} bps",
        terms.spt_threshold, terms.base_spread_bps, terms.step_bps
    );
    println!("  2025-FY verification reports NDVI 0.83");

    feed.publish(TRANSACTION_ID, 0.83)?;
    let document = with_reading(&deal_document(DEAL_ID), 0.83, "2025-FY");
    let record = DecisionRecord::new(TRANSACTION_ID);

    let outcome = applicator.evaluate_and_apply(&evaluator, &feed, &record, &document)?;
    println!(
        "  Decision:    {} → {}",
        record.current_state, outcome.record.current_state
    );

    if let Some(ratchet) = &outcome.ratchet {
        println!("  Ratchet:     {} ({})", ratchet.classification, ratchet.penalty_display);
        println!("  New spread:  {}", ratchet.new_spread_display);
        println!(
            "  Borrower saves {} / yr ({} / mo)",
            ratchet.annual_impact_display.trim_start_matches('-'),
            ratchet.monthly_impact_display.trim_start_matches('-')
        );
        println!("  {}", ratchet.explanation);
    }

    let stored = covenant_record::get(&outcome.document, &terms.impact_path)
        .and_then(|artifact| covenant_record::get(artifact, "result.classification"));
    println!(
        "  Stored at:   {} ({})",
        terms.impact_path,
        stored.and_then(|v| v.as_str()).unwrap_or("missing")
    );
    println!();

    println!(
        "  Audit chain integrity:  {} ({} event(s), closed: {})",
        if audit.verify_integrity() { "VERIFIED" } else { "FAILED" },
        audit.export_log()?.events.len(),
        audit.is_closed(TRANSACTION_ID)?
    );
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}
