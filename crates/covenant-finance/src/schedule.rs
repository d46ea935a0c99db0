//! Before/after spread-schedule artifact for the audit record.

use tracing::warn;

use covenant_contracts::ratchet::{
    SpreadSchedule, SpreadScheduleCdm, SpreadScheduleDiff, SpreadScheduleState,
};

/// Path of the changed value inside `before`/`after`, in accessor syntax.
pub const SPREAD_FIELD: &str = "spreadSchedule.initialValue";

/// Label written to `diff.changeType`.
///
/// Emitted for every diff, including decreases, so existing audit records and
/// new ones stay comparable.
pub const CHANGE_TYPE: &str = "INCREASE";

pub const SCHEDULE_TYPE: &str = "FLOATING_RATE_SPREAD";

fn bps_to_decimal(bps: i64) -> f64 {
    bps as f64 / 10_000.0
}

fn snapshot(bps: i64) -> SpreadScheduleState {
    SpreadScheduleState {
        spread_schedule: SpreadSchedule {
            initial_value: bps_to_decimal(bps),
            schedule_type: SCHEDULE_TYPE.to_string(),
        },
    }
}

/// Describe a spread change from `base_spread_bps` to `penalty_spread_bps`
/// caused by `trigger_event`.
pub fn generate_spread_schedule_cdm(
    base_spread_bps: i64,
    penalty_spread_bps: i64,
    trigger_event: &str,
) -> SpreadScheduleCdm {
    if penalty_spread_bps < base_spread_bps {
        warn!(
            base_spread_bps,
            penalty_spread_bps,
            trigger = %trigger_event,
            "spread decreased but diff is labelled {CHANGE_TYPE}"
        );
    }

    SpreadScheduleCdm {
        before: snapshot(base_spread_bps),
        after: snapshot(penalty_spread_bps),
        diff: SpreadScheduleDiff {
            field: SPREAD_FIELD.to_string(),
            old_value: bps_to_decimal(base_spread_bps),
            new_value: bps_to_decimal(penalty_spread_bps),
            change_type: CHANGE_TYPE.to_string(),
            trigger: trigger_event.to_string(),
        },
    }
}
