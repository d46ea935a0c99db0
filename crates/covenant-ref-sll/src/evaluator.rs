//! A threshold rule evaluator over the deal document's NDVI reading.
//!
//! | reading                    | from PENDING | from FLAGGED |
//! |----------------------------|--------------|--------------|
//! | missing                    | FLAG         | FLAG         |
//! | below `spt - 0.1`          | FLAG         | BLOCK        |
//! | in `[spt - 0.1, spt)`      | FLAG         | ALLOW        |
//! | at or above `spt`          | ALLOW        | ALLOW        |
//!
//! The evaluator does not consult the transition table. From a terminal state
//! it answers as if the record were pending, and the applicator rejects the
//! result.

use serde_json::{json, Value};

use covenant_contracts::{
    decision::{DecisionRecord, DecisionToken, PolicyDecisionState, PolicyEvaluation},
    error::CovenantResult,
    terms::FacilityTerms,
};
use covenant_core::traits::RuleEvaluator;

use crate::mock_data::NDVI_READING_PATH;

pub const RULE_MISSING: &str = "ndvi-measurement-missing";
pub const RULE_BELOW_BAND: &str = "ndvi-below-spt-band";
pub const RULE_WARNING_BAND: &str = "ndvi-within-warning-band";
pub const RULE_MEETS_SPT: &str = "ndvi-meets-spt";
pub const RULE_REPEAT_BREACH: &str = "repeat-breach-escalation";
pub const RULE_REMEDIATED: &str = "remediation-accepted";

const WARNING_BAND: f64 = 0.1;

pub struct NdviThresholdEvaluator {
    spt_threshold: f64,
}

impl NdviThresholdEvaluator {
    pub fn new(spt_threshold: f64) -> Self {
        Self { spt_threshold }
    }

    pub fn for_terms(terms: &FacilityTerms) -> Self {
        Self::new(terms.spt_threshold)
    }

    fn decide(&self, state: PolicyDecisionState, reading: Option<f64>) -> (DecisionToken, &'static str) {
        let flagged = state == PolicyDecisionState::Flagged;
        match reading {
            None => (DecisionToken::Flag, RULE_MISSING),
            Some(ndvi) if ndvi >= self.spt_threshold => (DecisionToken::Allow, RULE_MEETS_SPT),
            Some(ndvi) if ndvi >= self.spt_threshold - WARNING_BAND => {
                if flagged {
                    (DecisionToken::Allow, RULE_REMEDIATED)
                } else {
                    (DecisionToken::Flag, RULE_WARNING_BAND)
                }
            }
            Some(_) if flagged => (DecisionToken::Block, RULE_REPEAT_BREACH),
            Some(_) => (DecisionToken::Flag, RULE_BELOW_BAND),
        }
    }
}

impl RuleEvaluator for NdviThresholdEvaluator {
    fn evaluate(&self, record: &DecisionRecord, document: &Value) -> CovenantResult<PolicyEvaluation> {
        let reading = covenant_record::get(document, NDVI_READING_PATH).and_then(Value::as_f64);
        let (decision, rule) = self.decide(record.current_state, reading);

        Ok(PolicyEvaluation {
            decision: decision.as_str().to_string(),
            matched_rules: [rule.to_string()].into_iter().collect(),
            trace: vec![json!({
                "rule": rule,
                "ndvi": reading,
                "spt": self.spt_threshold,
                "fromState": record.current_state,
                "decision": decision,
            })],
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use covenant_contracts::decision::{DecisionRecord, PolicyDecisionState};
    use covenant_core::traits::RuleEvaluator;

    use super::*;

    fn evaluate(state: PolicyDecisionState, doc: serde_json::Value) -> PolicyEvaluation {
        let mut record = DecisionRecord::new("txn");
        record.current_state = state;
        NdviThresholdEvaluator::new(0.8).evaluate(&record, &doc).unwrap()
    }

    fn reading(ndvi: f64) -> serde_json::Value {
        json!({ "sustainability": { "verification": { "ndvi": ndvi } } })
    }

    #[test]
    fn pending_breach_is_flagged() {
        let eval = evaluate(PolicyDecisionState::Pending, reading(0.6));
        assert_eq!(eval.decision, "FLAG");
        assert!(eval.matched_rules.contains(RULE_BELOW_BAND));
    }

    #[test]
    fn flagged_breach_is_blocked() {
        let eval = evaluate(PolicyDecisionState::Flagged, reading(0.6));
        assert_eq!(eval.decision, "BLOCK");
        assert!(eval.matched_rules.contains(RULE_REPEAT_BREACH));
    }

    #[test]
    fn warning_band_depends_on_state() {
        assert_eq!(evaluate(PolicyDecisionState::Pending, reading(0.75)).decision, "FLAG");
        assert_eq!(evaluate(PolicyDecisionState::Flagged, reading(0.75)).decision, "ALLOW");
    }

    #[test]
    fn meeting_target_is_allowed() {
        let eval = evaluate(PolicyDecisionState::Pending, reading(0.8));
        assert_eq!(eval.decision, "ALLOW");
        assert_eq!(eval.trace[0]["rule"], json!(RULE_MEETS_SPT));
    }

    #[test]
    fn missing_reading_is_flagged() {
        let eval = evaluate(PolicyDecisionState::Pending, json!({}));
        assert_eq!(eval.decision, "FLAG");
        assert!(eval.matched_rules.contains(RULE_MISSING));
        assert_eq!(eval.trace[0]["ndvi"], json!(null));
    }

    #[test]
    fn terminal_state_still_answers() {
        assert_eq!(evaluate(PolicyDecisionState::Blocked, reading(0.95)).decision, "ALLOW");
    }
}
