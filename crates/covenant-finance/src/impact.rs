//! Cost of moving a facility from its base spread to a penalty spread.

use covenant_contracts::ratchet::BreachImpact;

use crate::money::{annualize, format_bps_as_pct, format_bps_delta, format_currency};

/// Compute the monetary impact of `penalty_spread_bps` versus `base_spread_bps`.
///
/// A penalty spread below the base yields a negative difference (an
/// improvement); this is computed, not rejected.
pub fn calculate_breach_impact(
    principal: f64,
    base_spread_bps: i64,
    penalty_spread_bps: i64,
) -> BreachImpact {
    let spread_diff_bps = penalty_spread_bps - base_spread_bps;
    let cost = annualize(principal, spread_diff_bps);

    BreachImpact {
        principal,
        base_spread_bps,
        penalty_spread_bps,
        spread_diff_bps,
        annualized_penalty: cost.annual,
        monthly_penalty: cost.monthly,
        daily_penalty: cost.daily,
        base_spread_pct: format_bps_as_pct(base_spread_bps),
        penalty_spread_pct: format_bps_as_pct(penalty_spread_bps),
        spread_diff_label: format_bps_delta(spread_diff_bps),
        annualized_penalty_display: format_currency(cost.annual),
        monthly_penalty_display: format_currency(cost.monthly),
        daily_penalty_display: format_currency(cost.daily),
    }
}
