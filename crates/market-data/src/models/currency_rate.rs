use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::rounding::round_dp;

/// Decimal places kept for every numeric field of a [`CurrencyRate`].
pub const RATE_DECIMALS: u32 = 4;

/// Official exchange rate of one currency against the rouble.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurrencyRate {
    /// Pair label, `"<CODE>/RUB"`
    pub currency: String,

    /// Current official rate
    pub rate: f64,

    /// `rate - previous`
    pub change: f64,

    /// `change / previous * 100`, zero when the previous rate is zero
    pub change_percent: f64,

    /// When this record was captured (not the upstream publish time)
    pub timestamp: DateTime<Utc>,
}

impl CurrencyRate {
    /// Builds a rate record, rounding every numeric field to [`RATE_DECIMALS`].
    ///
    /// Negative values are unusual for an official rate but are kept; each one
    /// is reported with a warning.
    pub fn new(
        currency: impl Into<String>,
        rate: f64,
        change: f64,
        change_percent: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let currency = currency.into();
        Self {
            rate: checked_field(&currency, "rate", rate),
            change: checked_field(&currency, "change", change),
            change_percent: checked_field(&currency, "change_percent", change_percent),
            currency,
            timestamp,
        }
    }

    /// Derives change and change percent from the current and previous rate.
    pub fn from_values(
        code: &str,
        current: f64,
        previous: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let change = current - previous;
        let change_percent = if previous != 0.0 {
            change / previous * 100.0
        } else {
            0.0
        };

        Self::new(
            format!("{}/RUB", code),
            current,
            change,
            change_percent,
            timestamp,
        )
    }
}

fn checked_field(currency: &str, field: &'static str, value: f64) -> f64 {
    if value < 0.0 {
        warn!(currency, field, value, "Negative value detected");
    }
    round_dp(value, RATE_DECIMALS)
}
