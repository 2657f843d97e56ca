use chrono::{DateTime, Utc};
use serde::Serialize;

use super::rounding::round_dp;

/// Decimal places kept for [`StockQuote::change_percent`].
pub const CHANGE_PERCENT_DECIMALS: u32 = 2;

/// Latest trade of one share on the exchange's main board.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockQuote {
    /// Exchange symbol (SECID), uppercase
    pub ticker: String,

    /// Last traded price, always positive for accepted quotes
    pub price: f64,

    /// Move from the session open, in percent
    pub change_percent: f64,

    /// Not provided by the market-data board; always zero
    pub volume: f64,

    /// When this record was captured
    pub timestamp: DateTime<Utc>,
}

impl StockQuote {
    /// Create a quote from the last and open price of the session.
    ///
    /// `change_percent` is zero when `open` is not positive.
    pub fn from_prices(ticker: &str, last: f64, open: f64, timestamp: DateTime<Utc>) -> Self {
        let change_percent = if open > 0.0 {
            (last - open) / open * 100.0
        } else {
            0.0
        };

        Self {
            ticker: ticker.to_uppercase(),
            price: last,
            change_percent: round_dp(change_percent, CHANGE_PERCENT_DECIMALS),
            volume: 0.0,
            timestamp,
        }
    }
}
