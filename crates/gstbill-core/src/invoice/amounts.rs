//! Money parsing, rounding and plain-decimal formatting (INR).

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Round to whole paise, half away from zero.
pub fn round_paise(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest line amount or quantity the pipeline accepts (10^20).
///
/// Sums and percentages of values in range stay far inside `Decimal`'s
/// 96-bit mantissa.
pub fn max_magnitude() -> Decimal {
    Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0)
}

/// Whether a line amount or quantity is within [`max_magnitude`].
pub fn within_bounds(value: Decimal) -> bool {
    value.abs() <= max_magnitude()
}

/// Whole rupees of an amount, dropping paise. Negative amounts give 0.
pub fn whole_rupees(amount: Decimal) -> u128 {
    let whole = amount.trunc();
    let divisor = 10i128.pow(whole.scale());
    u128::try_from(whole.mantissa() / divisor).unwrap_or(0)
}

/// Parse an amount as stored in records ("1,250.50", "₹ 99", "1e3").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    let trimmed = trimmed
        .strip_prefix("Rs.")
        .or_else(|| trimmed.strip_prefix("Rs"))
        .unwrap_or(trimmed);

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\u{00a0}' | '₹'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Format an amount as a plain decimal with two places ("1180.00").
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_paise(amount))
}
