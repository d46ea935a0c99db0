//! The decision application facade.
//!
//! Call order per decision:
//!
//!   Validate transition → [Ratchet → Spread schedule] → Document write → Audit
//!
//! Transition validation always comes first. An illegal or unrecognized
//! decision returns before any financial computation runs, so it can never
//! leave a financial side-effect record, a document change, or an audit entry.

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use covenant_contracts::{
    audit::{DecisionAuditEntry, RatchetSummary},
    decision::{DecisionId, DecisionRecord, PolicyEvaluation},
    error::{CovenantError, CovenantResult},
    ratchet::{MarginRatchetResult, SpreadScheduleCdm},
    terms::FacilityTerms,
};
use covenant_finance::{generate_spread_schedule_cdm, ratchet_for_terms};
use covenant_policy::state_machine::{apply_decision, apply_to_record, valid_transitions};
use covenant_record::set;

use crate::traits::{AuditWriter, MeasurementSource, RuleEvaluator};

/// Everything a successful `apply` produces. The caller persists it.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    /// The decision record after the transition.
    pub record: DecisionRecord,
    /// A new copy of the transaction document with the decision summary and,
    /// when computed, the ratchet artifact installed.
    pub document: Value,
    pub ratchet: Option<MarginRatchetResult>,
    pub spread_schedule: Option<SpreadScheduleCdm>,
    /// The entry that was written to the audit sink.
    pub audit_entry: DecisionAuditEntry,
}

/// Applies policy decisions for one facility.
///
/// Holds only immutable terms and the audit sink, so one applicator can serve
/// any number of transactions on that facility concurrently.
pub struct DecisionApplicator {
    terms: FacilityTerms,
    audit: Box<dyn AuditWriter>,
}

impl DecisionApplicator {
    pub fn new(terms: FacilityTerms, audit: Box<dyn AuditWriter>) -> Self {
        Self { terms, audit }
    }

    pub fn terms(&self) -> &FacilityTerms {
        &self.terms
    }

    /// Apply `evaluation` to `record` and attach the results to `document`.
    ///
    /// # Pipeline
    ///
    /// 1. Validate and apply the transition on a copy of `record`; errors
    ///    (`InvalidDecision`, `IllegalTransition`) return immediately
    /// 2. Merge the evaluation's matched rules and trace into the record
    /// 3. If the facility is sustainability-linked and `ndvi_score` is present,
    ///    compute the margin ratchet and its spread schedule
    /// 4. Write the decision summary, and the ratchet artifact if any, into a
    ///    copy of `document`
    /// 5. Append the audit entry, closing the transaction in the same write if
    ///    the new state is terminal
    ///
    /// Neither `record` nor `document` is modified.
    pub fn apply(
        &self,
        record: &DecisionRecord,
        evaluation: &PolicyEvaluation,
        ndvi_score: Option<f64>,
        document: &Value,
    ) -> CovenantResult<DecisionOutcome> {
        let transaction_id = record.transaction_id.as_str();
        let from_state = record.current_state;

        debug!(
            transaction_id = %transaction_id,
            current_state = %from_state,
            decision = %evaluation.decision,
            "applying policy decision"
        );

        // ── Step 1: Transition validation ────────────────────────────────────
        let mut next = record.clone();
        let to_state = apply_to_record(&mut next, &evaluation.decision)?;
        let decision = next.decision_input.ok_or_else(|| CovenantError::InvalidDecision {
            token: evaluation.decision.clone(),
        })?;

        // ── Step 2: Rule provenance ──────────────────────────────────────────
        next.matched_rules
            .extend(evaluation.matched_rules.iter().cloned());
        next.trace.extend(evaluation.trace.iter().cloned());

        // ── Step 3: Financial impact ─────────────────────────────────────────
        let (ratchet, spread_schedule) = match (self.terms.sustainability_linked, ndvi_score) {
            (true, Some(score)) => {
                let ratchet = ratchet_for_terms(&self.terms, score);
                let schedule = generate_spread_schedule_cdm(
                    self.terms.base_spread_bps,
                    ratchet.new_spread_bps,
                    &self.terms.trigger_event,
                );
                info!(
                    transaction_id = %transaction_id,
                    classification = %ratchet.classification,
                    penalty_bps = ratchet.penalty_bps,
                    new_spread_bps = ratchet.new_spread_bps,
                    "margin ratchet computed"
                );
                (Some(ratchet), Some(schedule))
            }
            (true, None) => {
                debug!(
                    transaction_id = %transaction_id,
                    "sustainability-linked facility has no measurement, skipping ratchet"
                );
                (None, None)
            }
            (false, _) => (None, None),
        };

        // ── Step 4: Document write ───────────────────────────────────────────
        let decided_at = Utc::now();
        let summary = json!({
            "transactionId": transaction_id,
            "state": to_state,
            "previousState": from_state,
            "decision": decision,
            "matchedRules": next.matched_rules,
            "decidedAt": decided_at.to_rfc3339(),
        });
        let mut updated = set(document, &self.terms.decision_path, summary);

        if let (Some(ratchet), Some(schedule)) = (&ratchet, &spread_schedule) {
            let artifact = json!({
                "result": serde_json::to_value(ratchet)?,
                "spreadSchedule": serde_json::to_value(schedule)?,
            });
            updated = set(&updated, &self.terms.impact_path, artifact);
        }

        // ── Step 5: Audit ────────────────────────────────────────────────────
        let audit_entry = DecisionAuditEntry {
            decision_id: DecisionId::new(),
            transaction_id: transaction_id.to_string(),
            from_state,
            to_state,
            decision,
            matched_rules: next.matched_rules.clone(),
            trace: evaluation.trace.clone(),
            ratchet: ratchet.as_ref().map(RatchetSummary::from),
            timestamp: decided_at,
        };
        let closes = valid_transitions(to_state).is_empty();
        self.audit.write(&audit_entry, closes)?;

        if closes {
            info!(
                transaction_id = %transaction_id,
                state = %to_state,
                "decision closed in audit"
            );
        }

        Ok(DecisionOutcome {
            record: next,
            document: updated,
            ratchet,
            spread_schedule,
            audit_entry,
        })
    }

    /// Run the full pipeline against external collaborators.
    ///
    /// The evaluator's decision is checked against the transition table
    /// before the measurement source is queried, so a rejected decision never
    /// triggers a measurement fetch.
    pub fn evaluate_and_apply(
        &self,
        evaluator: &dyn RuleEvaluator,
        source: &dyn MeasurementSource,
        record: &DecisionRecord,
        document: &Value,
    ) -> CovenantResult<DecisionOutcome> {
        let evaluation = evaluator.evaluate(record, document)?;

        if let Err(e) = apply_decision(record.current_state, &evaluation.decision) {
            warn!(
                transaction_id = %record.transaction_id,
                error = %e,
                "evaluator produced a decision the table rejects"
            );
            return Err(e);
        }

        let ndvi_score = if self.terms.sustainability_linked {
            source.ndvi_score(&record.transaction_id)?
        } else {
            None
        };

        self.apply(record, &evaluation, ndvi_score, document)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
