//! Per-facility configuration consumed by the decision facade.
//!
//! Deserialized from the `[facility]` table of a TOML terms file by
//! `covenant-policy`. Fields with defaults may be omitted.

use serde::{Deserialize, Serialize};

/// Default base margin over the reference rate.
pub const DEFAULT_BASE_SPREAD_BPS: i64 = 200;

/// Default size of one ratchet step.
pub const DEFAULT_STEP_BPS: i64 = 25;

/// Economic and document-layout terms for one financed asset.
///
/// ```toml
/// [facility]
/// principal = 5000000.0
/// spt_threshold = 0.8
/// sustainability_linked = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityTerms {
    /// Outstanding principal the spread applies to.
    pub principal: f64,

    /// Sustainability performance target for the NDVI measurement.
    pub spt_threshold: f64,

    #[serde(default = "default_base_spread_bps")]
    pub base_spread_bps: i64,

    #[serde(default = "default_step_bps")]
    pub step_bps: i64,

    /// Only sustainability-linked facilities get a ratchet computed.
    #[serde(default)]
    pub sustainability_linked: bool,

    /// Where the ratchet artifact is installed in the transaction document.
    #[serde(default = "default_impact_path")]
    pub impact_path: String,

    /// Where the decision summary is installed in the transaction document.
    #[serde(default = "default_decision_path")]
    pub decision_path: String,

    /// Identifier recorded as the trigger of a spread change.
    #[serde(default = "default_trigger_event")]
    pub trigger_event: String,
}

fn default_base_spread_bps() -> i64 {
    DEFAULT_BASE_SPREAD_BPS
}

fn default_step_bps() -> i64 {
    DEFAULT_STEP_BPS
}

fn default_impact_path() -> String {
    "sustainability.marginRatchet".to_string()
}

fn default_decision_path() -> String {
    "policyDecision".to_string()
}

fn default_trigger_event() -> String {
    "NDVI_MEASUREMENT".to_string()
}

impl FacilityTerms {
    /// Terms for a sustainability-linked facility with every other field defaulted.
    pub fn sustainability_linked(principal: f64, spt_threshold: f64) -> Self {
        Self {
            principal,
            spt_threshold,
            base_spread_bps: DEFAULT_BASE_SPREAD_BPS,
            step_bps: DEFAULT_STEP_BPS,
            sustainability_linked: true,
            impact_path: default_impact_path(),
            decision_path: default_decision_path(),
            trigger_event: default_trigger_event(),
        }
    }
}
