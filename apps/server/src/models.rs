use chrono::{DateTime, Utc};
use findash_market_data::{CurrencyRate, QuoteMap, RateMap, StockQuote};
use serde::Serialize;

pub const CBR_SOURCE: &str = "cbr";
pub const MOEX_SOURCE: &str = "moex";

/// Envelope for `GET /rates/cbr`.
#[derive(Debug, Serialize)]
pub struct RatesResponse {
    pub source: &'static str,
    pub data: RateMap,
    pub timestamp: DateTime<Utc>,
    pub currencies_count: usize,
    pub success: bool,
}

impl RatesResponse {
    pub fn new(data: RateMap) -> Self {
        Self {
            source: CBR_SOURCE,
            currencies_count: data.len(),
            data,
            timestamp: Utc::now(),
            success: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub source: &'static str,
    pub data: CurrencyRate,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}

impl From<CurrencyRate> for RateResponse {
    fn from(data: CurrencyRate) -> Self {
        Self {
            source: CBR_SOURCE,
            data,
            timestamp: Utc::now(),
            success: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SupportedCurrencies {
    pub supported_currencies: Vec<String>,
    pub count: usize,
}

impl From<Vec<String>> for SupportedCurrencies {
    fn from(supported_currencies: Vec<String>) -> Self {
        Self {
            count: supported_currencies.len(),
            supported_currencies,
        }
    }
}

/// Envelope for `GET /stocks/moex`.
#[derive(Debug, Serialize)]
pub struct StocksResponse {
    pub source: &'static str,
    pub data: QuoteMap,
    pub timestamp: DateTime<Utc>,
    pub stocks_count: usize,
    pub success: bool,
}

impl StocksResponse {
    pub fn new(data: QuoteMap) -> Self {
        Self {
            source: MOEX_SOURCE,
            stocks_count: data.len(),
            data,
            timestamp: Utc::now(),
            success: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub source: &'static str,
    pub data: StockQuote,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}

impl From<StockQuote> for StockResponse {
    fn from(data: StockQuote) -> Self {
        Self {
            source: MOEX_SOURCE,
            data,
            timestamp: Utc::now(),
            success: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SupportedStocks {
    pub supported_stocks: Vec<String>,
    pub count: usize,
}

impl From<Vec<String>> for SupportedStocks {
    fn from(supported_stocks: Vec<String>) -> Self {
        Self {
            count: supported_stocks.len(),
            supported_stocks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RootInfo {
    pub message: String,
    pub version: String,
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub docs: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub api: &'static str,
    pub cbr_api: &'static str,
    pub moex_api: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub services: ServiceStatus,
}
