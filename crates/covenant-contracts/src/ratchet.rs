//! Result bundles produced by the financial impact calculators.
//!
//! All of these are pure output: produced fresh on every call, never stored by
//! the engine, and safe to recompute from the same inputs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Compliance band of an NDVI measurement relative to its SPT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceClassification {
    /// At least 0.1 above target. Earns a discount.
    ExceedsTarget,
    /// At or above target, below the discount band.
    Compliant,
    /// Within 0.1 below target.
    Warning,
    /// More than 0.1 below target. Penalty scales with severity tier.
    Breach,
}

impl ComplianceClassification {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExceedsTarget => "EXCEEDS_TARGET",
            Self::Compliant => "COMPLIANT",
            Self::Warning => "WARNING",
            Self::Breach => "BREACH",
        }
    }
}

impl fmt::Display for ComplianceClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monetary consequence of moving a facility from one spread to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreachImpact {
    pub principal: f64,
    pub base_spread_bps: i64,
    pub penalty_spread_bps: i64,
    /// `penalty - base`. Negative means the spread improved.
    pub spread_diff_bps: i64,
    /// Annual cost increase, rounded to cents.
    pub annualized_penalty: f64,
    pub monthly_penalty: f64,
    pub daily_penalty: f64,
    /// e.g. `"2.00%"`.
    pub base_spread_pct: String,
    pub penalty_spread_pct: String,
    /// e.g. `"+25 bps"`.
    pub spread_diff_label: String,
    /// e.g. `"$25,000.00"`.
    pub annualized_penalty_display: String,
    pub monthly_penalty_display: String,
    pub daily_penalty_display: String,
}

/// Outcome of one margin-ratchet evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginRatchetResult {
    pub classification: ComplianceClassification,
    pub ndvi_score: f64,
    pub spt_threshold: f64,
    pub principal: f64,
    pub base_spread_bps: i64,
    pub step_bps: i64,
    /// Signed adjustment. Negative for a discount.
    pub penalty_bps: i64,
    pub new_spread_bps: i64,
    /// Present only for `BREACH`.
    pub severity_tier: Option<u32>,
    /// `new_spread_bps / 100`, e.g. `2.25`.
    pub new_spread_pct: f64,
    /// e.g. `"2.25%"`.
    pub new_spread_display: String,
    /// e.g. `"+25 bps"`, `"-25 bps"`, `"0 bps"`.
    pub penalty_display: String,
    pub annual_impact: f64,
    pub monthly_impact: f64,
    pub daily_impact: f64,
    pub annual_impact_display: String,
    pub monthly_impact_display: String,
    pub daily_impact_display: String,
    pub is_breach: bool,
    pub is_penalty: bool,
    pub is_discount: bool,
    /// User-facing message chosen by classification branch.
    pub explanation: String,
}

/// One spread-schedule snapshot (decimal form: bps / 10000).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadSchedule {
    pub initial_value: f64,
    #[serde(rename = "type")]
    pub schedule_type: String,
}

/// The spread-schedule state on one side of a trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadScheduleState {
    pub spread_schedule: SpreadSchedule,
}

/// Flat diff between the before and after states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadScheduleDiff {
    /// Field path of the changed value, in accessor path syntax.
    pub field: String,
    pub old_value: f64,
    pub new_value: f64,
    pub change_type: String,
    pub trigger: String,
}

/// Before/after audit artifact for a spread change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadScheduleCdm {
    pub before: SpreadScheduleState,
    pub after: SpreadScheduleState,
    pub diff: SpreadScheduleDiff,
}
