//! Basis-point arithmetic, currency rounding, and display formatting.

/// 1 bp = 0.0001 in decimal form.
pub const BPS_TO_DECIMAL: f64 = 0.0001;

/// Fixed-length year; not calendar-aware.
pub const DAYS_PER_YEAR: f64 = 365.0;

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Round to cents, half away from zero, on the value scaled by 100.
///
/// The scaling happens in binary floating point, so `1.005` (which scales to
/// `100.49999…`) rounds down to `1.0` while `0.125` rounds up to `0.13`.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Annual, monthly, and daily amounts, each rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annualized {
    pub annual: f64,
    pub monthly: f64,
    pub daily: f64,
}

/// Annual cost of `bps` on `principal`, split by month and by day.
///
/// Monthly and daily figures are derived from the unrounded annual amount.
pub fn annualize(principal: f64, bps: i64) -> Annualized {
    let annual = principal * bps as f64 * BPS_TO_DECIMAL;
    Annualized {
        annual: round_currency(annual),
        monthly: round_currency(annual / MONTHS_PER_YEAR),
        daily: round_currency(annual / DAYS_PER_YEAR),
    }
}

/// `225` → `"2.25%"`.
pub fn format_bps_as_pct(bps: i64) -> String {
    format!("{:.2}%", bps as f64 / 100.0)
}

/// `25` → `"+25 bps"`, `-25` → `"-25 bps"`, `0` → `"0 bps"`.
pub fn format_bps_delta(bps: i64) -> String {
    if bps > 0 {
        format!("+{bps} bps")
    } else {
        format!("{bps} bps")
    }
}

/// `25000.0` → `"$25,000.00"`, `-2500.5` → `"-$2,500.50"`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{:02}", cents % 100)
}
