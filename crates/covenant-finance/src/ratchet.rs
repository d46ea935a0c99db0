//! Margin ratchet: NDVI compliance banding and the resulting spread.
//!
//! Bands relative to the sustainability performance target (SPT):
//!
//! ```text
//!            ndvi >= spt + 0.1   EXCEEDS_TARGET   -step
//! spt       <= ndvi < spt + 0.1  COMPLIANT         0
//! spt - 0.1 <= ndvi < spt        WARNING          +step
//!              ndvi < spt - 0.1  BREACH           +step * tier, at most 4 steps
//! ```
//!
//! where `tier = floor((spt - ndvi) / 0.1)`.

use covenant_contracts::{
    ratchet::{ComplianceClassification, MarginRatchetResult},
    terms::{FacilityTerms, DEFAULT_BASE_SPREAD_BPS, DEFAULT_STEP_BPS},
};

use crate::money::{annualize, format_bps_as_pct, format_bps_delta, format_currency};

/// Width of each NDVI band around the SPT.
pub const BAND_WIDTH: f64 = 0.1;

/// A breach penalty never exceeds this many steps.
pub const MAX_SEVERITY_TIERS: i64 = 4;

/// Classify `ndvi_score` against `spt_threshold`.
///
/// Returns the severity tier alongside `BREACH`. For finite inputs the tier
/// is `floor((spt - ndvi) / 0.1)`, which is already at least 1 below the
/// warning band. A NaN input falls through every comparison into `BREACH` and
/// is reported as tier 1.
pub fn classify(ndvi_score: f64, spt_threshold: f64) -> (ComplianceClassification, Option<u32>) {
    if ndvi_score >= spt_threshold + BAND_WIDTH {
        (ComplianceClassification::ExceedsTarget, None)
    } else if ndvi_score >= spt_threshold {
        (ComplianceClassification::Compliant, None)
    } else if ndvi_score >= spt_threshold - BAND_WIDTH {
        (ComplianceClassification::Warning, None)
    } else {
        // `as` saturates: NaN maps to 0, infinity to u32::MAX.
        let tier = ((spt_threshold - ndvi_score) / BAND_WIDTH).floor() as u32;
        (ComplianceClassification::Breach, Some(tier.max(1)))
    }
}

/// Compute the ratchet outcome for one measurement.
///
/// Inputs are not range-checked; a score outside `[0, 1]` is classified as
/// given.
pub fn calculate_margin_ratchet(
    ndvi_score: f64,
    spt_threshold: f64,
    principal: f64,
    base_spread_bps: i64,
    step_bps: i64,
) -> MarginRatchetResult {
    let (classification, severity_tier) = classify(ndvi_score, spt_threshold);

    let penalty_bps = match classification {
        ComplianceClassification::ExceedsTarget => -step_bps,
        ComplianceClassification::Compliant => 0,
        ComplianceClassification::Warning => step_bps,
        ComplianceClassification::Breach => {
            let tier = i64::from(severity_tier.unwrap_or(1));
            step_bps
                .saturating_mul(tier)
                .min(step_bps.saturating_mul(MAX_SEVERITY_TIERS))
        }
    };

    let new_spread_bps = base_spread_bps + penalty_bps;
    let impact = annualize(principal, penalty_bps);
    let new_spread_display = format_bps_as_pct(new_spread_bps);

    let explanation = explain(
        classification,
        ndvi_score,
        spt_threshold,
        step_bps,
        penalty_bps,
        severity_tier,
        &new_spread_display,
    );

    MarginRatchetResult {
        classification,
        ndvi_score,
        spt_threshold,
        principal,
        base_spread_bps,
        step_bps,
        penalty_bps,
        new_spread_bps,
        severity_tier,
        new_spread_pct: new_spread_bps as f64 / 100.0,
        new_spread_display,
        penalty_display: format_bps_delta(penalty_bps),
        annual_impact: impact.annual,
        monthly_impact: impact.monthly,
        daily_impact: impact.daily,
        annual_impact_display: format_currency(impact.annual),
        monthly_impact_display: format_currency(impact.monthly),
        daily_impact_display: format_currency(impact.daily),
        is_breach: classification == ComplianceClassification::Breach,
        is_penalty: penalty_bps > 0,
        is_discount: penalty_bps < 0,
        explanation,
    }
}

/// `calculate_margin_ratchet` with a 200 bps base spread and 25 bps steps.
pub fn calculate_margin_ratchet_with_defaults(
    ndvi_score: f64,
    spt_threshold: f64,
    principal: f64,
) -> MarginRatchetResult {
    calculate_margin_ratchet(
        ndvi_score,
        spt_threshold,
        principal,
        DEFAULT_BASE_SPREAD_BPS,
        DEFAULT_STEP_BPS,
    )
}

/// `calculate_margin_ratchet` using a facility's configured terms.
pub fn ratchet_for_terms(terms: &FacilityTerms, ndvi_score: f64) -> MarginRatchetResult {
    calculate_margin_ratchet(
        ndvi_score,
        terms.spt_threshold,
        terms.principal,
        terms.base_spread_bps,
        terms.step_bps,
    )
}

fn explain(
    classification: ComplianceClassification,
    ndvi: f64,
    spt: f64,
    step_bps: i64,
    penalty_bps: i64,
    severity_tier: Option<u32>,
    new_spread: &str,
) -> String {
    match classification {
        ComplianceClassification::ExceedsTarget => format!(
            "NDVI score {ndvi:.3} exceeds the sustainability performance target {spt:.3} \
             by at least 0.1. Margin discount of {step_bps} bps applied; new spread {new_spread}."
        ),
        ComplianceClassification::Compliant => format!(
            "NDVI score {ndvi:.3} meets the sustainability performance target {spt:.3}. \
             No margin adjustment; spread remains {new_spread}."
        ),
        ComplianceClassification::Warning => format!(
            "NDVI score {ndvi:.3} is below the sustainability performance target {spt:.3} \
             but within the 0.1 warning band. Margin penalty of {step_bps} bps applied; \
             new spread {new_spread}."
        ),
        ComplianceClassification::Breach => format!(
            "NDVI score {ndvi:.3} breaches the sustainability performance target {spt:.3} \
             (severity tier {}). Margin penalty of {penalty_bps} bps applied; \
             new spread {new_spread}.",
            severity_tier.unwrap_or(1)
        ),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
