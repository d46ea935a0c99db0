//! # covenant-ref-sll
//!
//! Sustainability-linked loan reference runtime for the covenant decision
//! engine.
//!
//! Demonstrates three scenarios using mock data:
//!
//! 1. **Ratchet Breach**: a facility is flagged, then blocked, as its NDVI
//!    falls through successive severity tiers.
//! 2. **Bypass Attempt**: a blocked transaction cannot be reopened, neither
//!    by a favourable re-evaluation nor by an unknown override token.
//! 3. **Discount**: an outperforming asset earns a one-step spread discount.
//!
//! All deals and readings are fictional. No external systems are contacted.

pub mod evaluator;
pub mod mock_data;
pub mod scenarios;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use covenant_audit::InMemoryAuditWriter;
    use covenant_contracts::{
        decision::{DecisionRecord, PolicyDecisionState},
        error::CovenantError,
        ratchet::ComplianceClassification,
    };
    use covenant_core::DecisionApplicator;
    use covenant_record::get;

    use crate::{
        evaluator::NdviThresholdEvaluator,
        mock_data::{deal_document, with_reading, MockNdviFeed},
        scenarios::{bypass_attempt, discount, ratchet_breach},
    };

    const AMAZONIA: &str = include_str!("../policies/amazonia-reforestation.toml");
    const RIFT_VALLEY: &str = include_str!("../policies/rift-valley-agroforestry.toml");
    const SUMATRA: &str = include_str!("../policies/sumatra-peatland.toml");

    #[test]
    fn test_policy_files_parse() {
        let amazonia = covenant_policy::terms::from_toml_str(AMAZONIA).unwrap();
        assert_eq!(amazonia.principal, 10_000_000.0);

        let rift = covenant_policy::terms::from_toml_str(RIFT_VALLEY).unwrap();
        assert_eq!(rift.step_bps, 20);
        assert_eq!(rift.impact_path, "facility.covenants[0].ratchet");

        // Omitted spreads and paths fall back to the defaults.
        let sumatra = covenant_policy::terms::from_toml_str(SUMATRA).unwrap();
        assert_eq!(sumatra.base_spread_bps, 200);
        assert_eq!(sumatra.step_bps, 25);
        assert_eq!(sumatra.decision_path, "policyDecision");
    }

    #[test]
    fn test_scenarios_run() {
        ratchet_breach::run_scenario().unwrap();
        bypass_attempt::run_scenario().unwrap();
        discount::run_scenario().unwrap();
    }

    /// The ratchet-breach walk-through, asserted step by step.
    #[test]
    fn test_flag_then_block_ratchets_up() {
        let terms = covenant_policy::terms::from_toml_str(AMAZONIA).unwrap();
        let audit = InMemoryAuditWriter::new("SLL-AMZ-2025-001");
        let feed = MockNdviFeed::new();
        let evaluator = NdviThresholdEvaluator::for_terms(&terms);
        let applicator = DecisionApplicator::new(terms, Box::new(audit.clone()));

        feed.publish("txn", 0.65).unwrap();
        let doc = with_reading(&deal_document("SLL-AMZ-2025-001"), 0.65, "2025-Q2");
        let flagged = applicator
            .evaluate_and_apply(&evaluator, &feed, &DecisionRecord::new("txn"), &doc)
            .unwrap();
        let first = flagged.ratchet.as_ref().unwrap();
        assert_eq!(flagged.record.current_state, PolicyDecisionState::Flagged);
        assert_eq!(first.classification, ComplianceClassification::Breach);
        assert_eq!(first.severity_tier, Some(1));
        assert_eq!(first.new_spread_bps, 225);

        feed.publish("txn", 0.55).unwrap();
        let doc = with_reading(&flagged.document, 0.55, "2025-Q3");
        let blocked = applicator
            .evaluate_and_apply(&evaluator, &feed, &flagged.record, &doc)
            .unwrap();
        let second = blocked.ratchet.as_ref().unwrap();
        assert_eq!(blocked.record.current_state, PolicyDecisionState::Blocked);
        assert_eq!(second.severity_tier, Some(2));
        assert_eq!(second.new_spread_bps, 250);
        assert_eq!(second.annual_impact, 50_000.0);

        assert_eq!(
            get(&blocked.document, "sustainability.marginRatchet.result.new_spread_bps"),
            Some(&json!(250))
        );
        assert!(audit.is_closed("txn").unwrap());
        assert_eq!(audit.export_log().unwrap().events.len(), 2);
        assert!(audit.verify_integrity());
    }

    #[test]
    fn test_blocked_transaction_stays_blocked() {
        let terms = covenant_policy::terms::from_toml_str(SUMATRA).unwrap();
        let audit = InMemoryAuditWriter::new("SLL-IDN-2025-007");
        let feed = MockNdviFeed::new();
        let evaluator = NdviThresholdEvaluator::for_terms(&terms);
        let applicator = DecisionApplicator::new(terms, Box::new(audit.clone()));

        let mut record = DecisionRecord::new("txn");
        record.current_state = PolicyDecisionState::Blocked;
        feed.publish("txn", 0.91).unwrap();
        let doc = with_reading(&deal_document("SLL-IDN-2025-007"), 0.91, "remediation");

        let result = applicator.evaluate_and_apply(&evaluator, &feed, &record, &doc);
        assert!(matches!(
            result,
            Err(CovenantError::IllegalTransition {
                from: PolicyDecisionState::Blocked,
                to: PolicyDecisionState::Allowed
            })
        ));
        assert!(audit.export_log().unwrap().events.is_empty());
    }

    #[test]
    fn test_outperformance_earns_discount_at_custom_path() {
        let terms = covenant_policy::terms::from_toml_str(RIFT_VALLEY).unwrap();
        let audit = InMemoryAuditWriter::new("SLL-KEN-2025-014");
        let feed = MockNdviFeed::new();
        let evaluator = NdviThresholdEvaluator::for_terms(&terms);
        let applicator = DecisionApplicator::new(terms, Box::new(audit));

        feed.publish("txn", 0.83).unwrap();
        let doc = with_reading(&deal_document("SLL-KEN-2025-014"), 0.83, "2025-FY");
        let outcome = applicator
            .evaluate_and_apply(&evaluator, &feed, &DecisionRecord::new("txn"), &doc)
            .unwrap();

        let ratchet = outcome.ratchet.as_ref().unwrap();
        assert_eq!(outcome.record.current_state, PolicyDecisionState::Allowed);
        assert_eq!(ratchet.classification, ComplianceClassification::ExceedsTarget);
        assert_eq!(ratchet.penalty_bps, -20);
        assert_eq!(ratchet.new_spread_bps, 155);
        assert_eq!(ratchet.annual_impact, -9_000.0);

        assert_eq!(
            get(&outcome.document, "facility.covenants[0].ratchet.result.classification"),
            Some(&json!("EXCEEDS_TARGET"))
        );
        assert_eq!(
            get(&outcome.document, "facility.covenants[0].decision.state"),
            Some(&json!("ALLOWED"))
        );
        // The covenant entry keeps its original fields.
        assert_eq!(get(&outcome.document, "facility.covenants[0].id"), Some(&json!("KPI-1")));
    }
}
