//! TOML loader for facility terms.
//!
//! A terms file carries one `[facility]` table:
//!
//! ```toml
//! [facility]
//! principal = 5000000.0
//! spt_threshold = 0.8
//! base_spread_bps = 200
//! step_bps = 25
//! sustainability_linked = true
//! impact_path = "sustainability.marginRatchet"
//! decision_path = "policyDecision"
//! trigger_event = "NDVI_Q3_VERIFICATION"
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use covenant_contracts::{
    error::{CovenantError, CovenantResult},
    terms::FacilityTerms,
};
use covenant_record::{FieldPath, Segment};

#[derive(Debug, Deserialize)]
struct TermsFile {
    facility: FacilityTerms,
}

/// Parse `s` as a TOML terms document.
///
/// Returns `CovenantError::ConfigError` if the TOML is malformed, does not
/// match the expected shape, or names unusable document paths.
pub fn from_toml_str(s: &str) -> CovenantResult<FacilityTerms> {
    let file: TermsFile = toml::from_str(s).map_err(|e| CovenantError::ConfigError {
        reason: format!("failed to parse facility terms TOML: {}", e),
    })?;
    let terms = file.facility;
    validate(&terms)?;

    debug!(
        principal = terms.principal,
        spt_threshold = terms.spt_threshold,
        base_spread_bps = terms.base_spread_bps,
        step_bps = terms.step_bps,
        sustainability_linked = terms.sustainability_linked,
        "facility terms loaded"
    );
    Ok(terms)
}

/// Read the file at `path` and parse it as facility terms.
pub fn from_file(path: &Path) -> CovenantResult<FacilityTerms> {
    let contents = std::fs::read_to_string(path).map_err(|e| CovenantError::ConfigError {
        reason: format!("failed to read terms file '{}': {}", path.display(), e),
    })?;
    from_toml_str(&contents)
}

fn validate(terms: &FacilityTerms) -> CovenantResult<()> {
    if !terms.principal.is_finite() || !terms.spt_threshold.is_finite() {
        return Err(CovenantError::ConfigError {
            reason: "principal and spt_threshold must be finite numbers".to_string(),
        });
    }
    if terms.impact_path.trim().is_empty() || terms.decision_path.trim().is_empty() {
        return Err(CovenantError::ConfigError {
            reason: "impact_path and decision_path must not be empty".to_string(),
        });
    }
    if paths_overlap(&terms.impact_path, &terms.decision_path) {
        return Err(CovenantError::ConfigError {
            reason: format!(
                "impact_path '{}' and decision_path '{}' overlap; one write would clobber the other",
                terms.impact_path, terms.decision_path
            ),
        });
    }
    Ok(())
}

/// True when the paths are equal or one addresses a location inside the other.
fn paths_overlap(a: &str, b: &str) -> bool {
    let (a, b) = (FieldPath::parse(a), FieldPath::parse(b));
    let (a, b) = (steps(&a), steps(&b));
    let shared = a.len().min(b.len());
    a[..shared] == b[..shared]
}

/// One lookup: a mapping key or a sequence position.
#[derive(PartialEq)]
enum Step<'a> {
    Key(&'a str),
    Index(usize),
}

/// Flatten a path into single lookups: `deal.parties[0]` becomes
/// `deal`, `parties`, `0`.
fn steps(path: &FieldPath) -> Vec<Step<'_>> {
    path.segments()
        .iter()
        .flat_map(|segment| match segment {
            Segment::Key(key) => vec![Step::Key(key)],
            Segment::Index { key, index } => vec![Step::Key(key), Step::Index(*index)],
        })
        .collect()
}
