//! Scenario 1: Ratchet Breach
//!
//! A reforestation facility misses its canopy target two quarters running.
//!
//! Step A — NDVI 0.65 against SPT 0.80 → FLAG, breach tier 1, +25 bps
//! Step B — NDVI 0.55 while FLAGGED   → BLOCK, breach tier 2, +50 bps
//!
//! The block is terminal, so the audit ledger closes the transaction.

use covenant_audit::InMemoryAuditWriter;
use covenant_contracts::{decision::DecisionRecord, error::CovenantResult};
use covenant_core::DecisionApplicator;
use covenant_finance::calculate_breach_impact;

use crate::{
    evaluator::NdviThresholdEvaluator,
    mock_data::{deal_document, with_reading, MockNdviFeed},
};

const AMAZONIA_TERMS: &str = include_str!("../../policies/amazonia-reforestation.toml");

const DEAL_ID: &str = "SLL-AMZ-2025-001";
const TRANSACTION_ID: &str = "SLL-AMZ-2025-001:drawdown-03";

/// Run Scenario 1: flag, then block, with the spread ratcheting up each time.
pub fn run_scenario() -> CovenantResult<()> {
    println!("=== Scenario 1: Ratchet Breach ===");
    println!();

    let terms = covenant_policy::terms::from_toml_str(AMAZONIA_TERMS)?;
    let audit = InMemoryAuditWriter::new(DEAL_ID);
    let feed = MockNdviFeed::new();
    let evaluator = NdviThresholdEvaluator::for_terms(&terms);
    let applicator = DecisionApplicator::new(terms.clone(), Box::new(audit.clone()));

    println!("  Deal:        {}", DEAL_ID);
    println!("  Transaction: {}", TRANSACTION_ID);
    println!(
        "  Terms:       principal ${:.0}, SPT {:.2}, base {} bps, step {} bps",
        terms.principal, terms.spt_threshold, terms.base_spread_bps, terms.step_bps
    );
    println!();

    // ── Step A: first missed reading → FLAG ──────────────────────────────────

    println!("  Step A: 2025-Q2 verification reports NDVI 0.65");
    feed.publish(TRANSACTION_ID, 0.65)?;
    let document = with_reading(&deal_document(DEAL_ID), 0.65, "2025-Q2");
    let record = DecisionRecord::new(TRANSACTION_ID);

    let flagged = applicator.evaluate_and_apply(&evaluator, &feed, &record, &document)?;
    println!("  Decision:    {} → {}", record.current_state, flagged.record.current_state);
    if let Some(ratchet) = &flagged.ratchet {
        println!("  Ratchet:     {} ({})", ratchet.classification, ratchet.penalty_display);
        println!("  New spread:  {}", ratchet.new_spread_display);
        println!("  Annual cost: {}", ratchet.annual_impact_display);
        println!("  {}", ratchet.explanation);
    }
    println!();

    // ── Step B: second missed reading while FLAGGED → BLOCK ──────────────────

    println!("  Step B: 2025-Q3 verification reports NDVI 0.55");
    feed.publish(TRANSACTION_ID, 0.55)?;
    let document = with_reading(&flagged.document, 0.55, "2025-Q3");

    let blocked = applicator.evaluate_and_apply(&evaluator, &feed, &flagged.record, &document)?;
    println!(
        "  Decision:    {} → {}",
        flagged.record.current_state, blocked.record.current_state
    );
    println!(
        "  Rules:       {}",
        blocked.record.matched_rules.iter().cloned().collect::<Vec<_>>().join(", ")
    );

    if let Some(ratchet) = &blocked.ratchet {
        println!(
            "  Ratchet:     {} tier {} ({})",
            ratchet.classification,
            ratchet.severity_tier.unwrap_or_default(),
            ratchet.penalty_display
        );

        let impact = calculate_breach_impact(
            terms.principal,
            terms.base_spread_bps,
            ratchet.new_spread_bps,
        );
        println!(
            "  Impact:      {} → {} ({})",
            impact.base_spread_pct, impact.penalty_spread_pct, impact.spread_diff_label
        );
        println!(
            "               {} / yr, {} / mo, {} / day",
            impact.annualized_penalty_display,
            impact.monthly_penalty_display,
            impact.daily_penalty_display
        );
    }
    if let Some(schedule) = &blocked.spread_schedule {
        println!(
            "  CDM diff:    {} {} → {} ({}, trigger {})",
            schedule.diff.field,
            schedule.diff.old_value,
            schedule.diff.new_value,
            schedule.diff.change_type,
            schedule.diff.trigger
        );
    }
    println!();

    let log = audit.export_log()?;
    println!(
        "  Audit chain integrity:  {} ({} event(s), closed: {})",
        if audit.verify_integrity() { "VERIFIED" } else { "FAILED" },
        log.events.len(),
        audit.is_closed(TRANSACTION_ID)?
    );
    println!("  Terminal hash:          {}", log.terminal_hash);
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
