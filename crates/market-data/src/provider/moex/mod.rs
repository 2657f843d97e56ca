//! Moscow Exchange (MOEX ISS) market data adapter.
//!
//! This adapter reads the TQBR board securities document:
//! `{base}/engines/stock/markets/shares/boards/TQBR/securities.json`
//!
//! ISS answers with columnar tables:
//!
//! ```json
//! {
//!   "marketdata": {
//!     "columns": ["SECID", "LAST", "OPEN"],
//!     "data": [["SBER", 280.5, 279.0], ["GAZP", 165.3, 166.0]]
//!   }
//! }
//! ```
//!
//! Rows are validated one by one; a bad row is skipped without affecting the
//! rest. Only a missing required column fails the batch.
//!
//! Unlike the rates adapter there is no cross-call cache: any failure yields
//! an empty batch. Volume is not part of the board's market data and is always
//! reported as zero.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::clock::{Clock, SystemClock};
use crate::errors::MarketDataError;
use crate::models::{QuoteMap, StockQuote};
use crate::provider::{FetchRequest, HttpTransport, ReqwestTransport, SourceAdapter};

/// Provider ID constant
const PROVIDER_ID: &str = "MOEX";

/// Default ISS root
pub const DEFAULT_MOEX_URL: &str = "https://iss.moex.com/iss";

/// Securities document of the main shares board, relative to the ISS root
const SECURITIES_PATH: &str = "/engines/stock/markets/shares/boards/TQBR/securities.json";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tracked tickers, in reporting order
const TRACKED_TICKERS: &[&str] = &["SBER", "GAZP", "VTBR", "YNDX", "ROSN", "LKOH", "MGNT"];

const SECID: &str = "SECID";
const LAST: &str = "LAST";
const OPEN: &str = "OPEN";

/// Where and how long to fetch the market data document.
#[derive(Clone, Debug)]
pub struct MoexConfig {
    /// ISS root, without a trailing slash
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for MoexConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MOEX_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Positions of the required columns within a market data row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ColumnIndex {
    secid: usize,
    last: usize,
    open: usize,
}

impl ColumnIndex {
    fn locate(columns: &[Value]) -> Result<Self, MarketDataError> {
        let position = |name: &str| {
            columns
                .iter()
                .position(|c| c.as_str() == Some(name))
                .ok_or_else(|| MarketDataError::MissingField {
                    provider: PROVIDER_ID.to_string(),
                    field: format!("marketdata.columns.{}", name),
                })
        };

        Ok(Self {
            secid: position(SECID)?,
            last: position(LAST)?,
            open: position(OPEN)?,
        })
    }

    fn max(&self) -> usize {
        self.secid.max(self.last).max(self.open)
    }
}

/// MOEX stock quotes adapter.
///
/// # Example
///
/// ```ignore
/// use findash_market_data::{MoexConfig, MoexQuoteAdapter, SourceAdapter};
///
/// let adapter = MoexQuoteAdapter::new(MoexConfig::default());
/// let quotes = adapter.fetch_all().await;
/// ```
pub struct MoexQuoteAdapter {
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    config: MoexConfig,
}

impl MoexQuoteAdapter {
    /// Create an adapter that talks to the network through `reqwest`.
    pub fn new(config: MoexConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()), Arc::new(SystemClock))
    }

    /// Create an adapter over an explicit transport and clock.
    pub fn with_transport(
        config: MoexConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            clock,
            config,
        }
    }

    fn securities_url(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            SECURITIES_PATH
        )
    }

    async fn fetch_quotes(&self) -> Result<QuoteMap, MarketDataError> {
        let url = self.securities_url();
        info!(provider = PROVIDER_ID, %url, "Fetching market data");

        let request = FetchRequest::new(PROVIDER_ID, url, self.config.timeout)
            .query("securities.columns", "SECID,SHORTNAME")
            .query("marketdata.columns", "SECID,LAST,OPEN");

        let document = self.transport.get(request).await?.into_json(PROVIDER_ID)?;
        parse_quotes(&document, self.clock.now())
    }
}

#[async_trait]
impl SourceAdapter for MoexQuoteAdapter {
    type Record = StockQuote;

    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_all(&self) -> QuoteMap {
        match self.fetch_quotes().await {
            Ok(quotes) => {
                let tickers: Vec<&String> = quotes.keys().collect();
                info!(
                    provider = PROVIDER_ID,
                    ?tickers,
                    "Successfully parsed data for {} stocks",
                    quotes.len()
                );
                quotes
            }
            Err(e) => {
                error!(
                    provider = PROVIDER_ID,
                    category = ?e.category(),
                    "Failed to fetch market data: {}",
                    e
                );
                QuoteMap::new()
            }
        }
    }

    fn list_supported_keys(&self) -> Vec<String> {
        TRACKED_TICKERS.iter().map(|ticker| ticker.to_string()).collect()
    }
}

/// Extracts quotes for tracked tickers from a securities document.
///
/// Fails only when the `marketdata` table lacks a required column. Rows that
/// are short, untracked, or carry unusable prices are skipped.
fn parse_quotes(document: &Value, captured_at: DateTime<Utc>) -> Result<QuoteMap, MarketDataError> {
    let marketdata = document.get("marketdata");
    let columns = marketdata
        .and_then(|m| m.get("columns"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let rows = marketdata
        .and_then(|m| m.get("data"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    debug!(
        provider = PROVIDER_ID,
        columns = ?columns,
        entries = rows.len(),
        "Market data table"
    );

    let index = ColumnIndex::locate(columns)?;

    let mut quotes = QuoteMap::new();
    for row in rows {
        if let Some(quote) = parse_row(row, index, captured_at) {
            quotes.insert(quote.ticker.clone(), quote);
        }
    }

    Ok(quotes)
}

/// Builds a quote from one positional row, or `None` if the row is unusable.
fn parse_row(row: &Value, index: ColumnIndex, captured_at: DateTime<Utc>) -> Option<StockQuote> {
    let cells = row.as_array()?;
    if cells.len() <= index.max() {
        return None;
    }

    let ticker = cells[index.secid].as_str()?;
    if !TRACKED_TICKERS.contains(&ticker) {
        return None;
    }

    let (Some(last), Some(open)) = (cells[index.last].as_f64(), cells[index.open].as_f64()) else {
        debug!(provider = PROVIDER_ID, ticker, "Skipping row without LAST/OPEN prices");
        return None;
    };

    if last <= 0.0 {
        debug!(provider = PROVIDER_ID, ticker, last, "Skipping row with non-positive LAST");
        return None;
    }

    Some(StockQuote::from_prices(ticker, last, open, captured_at))
}
