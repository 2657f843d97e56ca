//! Findash Market Data Crate
//!
//! This crate fetches and normalizes the two upstream feeds behind the
//! Findash API.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Official currency rates from the Central Bank of Russia (`CBR`)
//! - Share quotes from the Moscow Exchange ISS (`MOEX`)
//! - A uniform, infallible adapter contract with cached/empty degradation
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Boundary Layer  | --> |  SourceAdapter   |  (fetch_all / fetch_one / list_supported_keys)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  HttpTransport   |  (reqwest, or a test double)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  Parser          |  (Valute table / ISS columnar table)
//!                          +------------------+
//!                                  |
//!                                  v
//!                     +---------------------------+
//!                     | CurrencyRate / StockQuote |  (normalized records)
//!                     +---------------------------+
//! ```
//!
//! # Core Types
//!
//! - [`SourceAdapter`] - Shared adapter contract
//! - [`CbrRateAdapter`] - Currency rates, with a last-good-batch cache
//! - [`MoexQuoteAdapter`] - Share quotes, no cache
//! - [`CurrencyRate`] / [`StockQuote`] - Normalized records
//! - [`MarketDataError`] - Internal failure type, never surfaced by adapters

pub mod clock;
pub mod errors;
pub mod models;
pub mod provider;

// Re-export all public types from models
pub use models::{CurrencyCode, CurrencyRate, QuoteMap, RateMap, StockQuote, Ticker};

// Re-export provider types
pub use provider::cbr::{CbrConfig, CbrRateAdapter, DEFAULT_CBR_URL};
pub use provider::moex::{MoexConfig, MoexQuoteAdapter, DEFAULT_MOEX_URL};
pub use provider::{FetchRequest, FetchResponse, HttpTransport, ReqwestTransport, SourceAdapter};

pub use clock::{Clock, SystemClock};
pub use errors::{ErrorCategory, MarketDataError};
