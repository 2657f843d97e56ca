//! Market data models
//!
//! This module contains the normalized records produced by the adapters:
//! - `types` - Type aliases for keys and result batches (CurrencyCode, Ticker, RateMap, QuoteMap)
//! - `currency_rate` - Central bank exchange rate record (CurrencyRate)
//! - `stock_quote` - Exchange quote record (StockQuote)

mod currency_rate;
mod rounding;
mod stock_quote;
mod types;

pub use currency_rate::{CurrencyRate, RATE_DECIMALS};
pub use stock_quote::{StockQuote, CHANGE_PERCENT_DECIMALS};
pub use types::{CurrencyCode, ProviderId, QuoteMap, RateMap, Ticker};
