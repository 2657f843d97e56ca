use std::collections::BTreeMap;

use super::{CurrencyRate, StockQuote};

/// Provider identifier - static constants ("CBR", "MOEX")
pub type ProviderId = &'static str;

/// Currency code as published by the central bank (ISO 4217, uppercase)
pub type CurrencyCode = String;

/// Exchange ticker (SECID), uppercase
pub type Ticker = String;

/// One batch of currency rates keyed by currency code
pub type RateMap = BTreeMap<CurrencyCode, CurrencyRate>;

/// One batch of stock quotes keyed by ticker
pub type QuoteMap = BTreeMap<Ticker, StockQuote>;
