use rust_decimal::prelude::{Decimal, ToPrimitive};

/// Rounds `value` to `dp` decimal places, half-to-even on the exact binary value.
///
/// Non-finite input is returned unchanged.
pub(crate) fn round_dp(value: f64, dp: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .and_then(|d| d.round_dp(dp).to_f64())
        .unwrap_or(value)
}
