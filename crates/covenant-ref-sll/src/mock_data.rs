//! Simulated sustainability-linked loan data.
//!
//! All deals, borrowers and readings here are fictional. This module stands
//! in for a loan-servicing system and a remote-sensing verification feed.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::{json, Value};
use tracing::debug;

use covenant_contracts::error::{CovenantError, CovenantResult};
use covenant_core::traits::MeasurementSource;

/// Where the latest verified NDVI reading lives inside a deal document.
pub const NDVI_READING_PATH: &str = "sustainability.verification.ndvi";

// ── Deal documents (mock) ─────────────────────────────────────────────────────

/// Return the transaction document for a known deal, or a minimal skeleton
/// for anything else.
///
/// Known deals:
/// - `SLL-AMZ-2025-001` — Amazonia reforestation, USD 10M
/// - `SLL-KEN-2025-014` — Rift Valley agroforestry, USD 4.5M
/// - `SLL-IDN-2025-007` — Sumatra peatland restoration, USD 7.25M
pub fn deal_document(deal_id: &str) -> Value {
    match deal_id {
        "SLL-AMZ-2025-001" => json!({
            "dealId": deal_id,
            "borrower": { "name": "Verde Canopy Holdings S.A.", "jurisdiction": "BR" },
            "facility": {
                "type": "TERM_LOAN",
                "currency": "USD",
                "principal": 10_000_000,
                "maturity": "2030-06-30"
            },
            "parties": [
                { "role": "BORROWER", "name": "Verde Canopy Holdings S.A." },
                { "role": "AGENT", "name": "Meridian Trust Bank" }
            ],
            "sustainability": {
                "kpi": "NDVI",
                "asset": "Para state reforestation parcels 14-22",
                "verification": { "ndvi": 0.83, "period": "2025-Q1" }
            }
        }),
        "SLL-KEN-2025-014" => json!({
            "dealId": deal_id,
            "borrower": { "name": "Rift Highlands Cooperative Ltd", "jurisdiction": "KE" },
            "facility": {
                "type": "REVOLVING",
                "currency": "USD",
                "principal": 4_500_000,
                "maturity": "2029-12-31",
                "covenants": [
                    { "id": "KPI-1", "kpi": "NDVI", "spt": 0.7 }
                ]
            },
            "sustainability": {
                "kpi": "NDVI",
                "asset": "Nakuru smallholder agroforestry belt",
                "verification": { "ndvi": 0.74, "period": "2024-FY" }
            }
        }),
        "SLL-IDN-2025-007" => json!({
            "dealId": deal_id,
            "borrower": { "name": "Gambut Lestari PT", "jurisdiction": "ID" },
            "facility": {
                "type": "TERM_LOAN",
                "currency": "USD",
                "principal": 7_250_000,
                "maturity": "2031-03-31"
            },
            "sustainability": {
                "kpi": "NDVI",
                "asset": "Riau peat dome restoration block C"
            }
        }),
        other => json!({ "dealId": other }),
    }
}

/// Install a new verified reading in `document`, returning the updated copy.
pub fn with_reading(document: &Value, ndvi: f64, period: &str) -> Value {
    let updated = covenant_record::set(document, NDVI_READING_PATH, json!(ndvi));
    covenant_record::set(&updated, "sustainability.verification.period", json!(period))
}

// ── NDVI feed (mock) ──────────────────────────────────────────────────────────

/// A remote-sensing feed that serves whatever reading was last published for
/// a transaction.
#[derive(Default)]
pub struct MockNdviFeed {
    readings: Mutex<BTreeMap<String, f64>>,
}

impl MockNdviFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `ndvi` as the latest reading for `transaction_id`.
    pub fn publish(&self, transaction_id: &str, ndvi: f64) -> CovenantResult<()> {
        let mut readings = self.readings.lock().map_err(|e| CovenantError::MeasurementUnavailable {
            transaction_id: transaction_id.to_string(),
            reason: format!("feed lock poisoned: {}", e),
        })?;
        readings.insert(transaction_id.to_string(), ndvi);
        debug!(transaction_id = %transaction_id, ndvi, "ndvi reading published");
        Ok(())
    }
}

impl MeasurementSource for MockNdviFeed {
    fn ndvi_score(&self, transaction_id: &str) -> CovenantResult<Option<f64>> {
        let readings = self.readings.lock().map_err(|e| CovenantError::MeasurementUnavailable {
            transaction_id: transaction_id.to_string(),
            reason: format!("feed lock poisoned: {}", e),
        })?;
        Ok(readings.get(transaction_id).copied())
    }
}
