//! Central Bank of Russia exchange rate adapter.
//!
//! This adapter reads the daily rates document published at
//! `https://www.cbr-xml-daily.ru/daily_json.js`:
//!
//! ```json
//! {
//!   "Date": "2024-01-15T11:30:00+03:00",
//!   "Valute": {
//!     "USD": { "CharCode": "USD", "Nominal": 1, "Value": 91.5, "Previous": 91.3 },
//!     ...
//!   }
//! }
//! ```
//!
//! Only the tracked currencies are extracted. A single malformed tracked
//! entry drops the whole batch, so a schema change upstream never yields a
//! half-valid result.
//!
//! Every decoded response replaces the cache, a dropped batch included, in
//! which case the cache becomes empty. Transport and decode failures serve
//! the cached batch in place of fresh data and never write it.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::errors::MarketDataError;
use crate::models::{CurrencyRate, RateMap};
use crate::provider::{FetchRequest, HttpTransport, ReqwestTransport, SourceAdapter};

/// Provider ID constant
const PROVIDER_ID: &str = "CBR";

/// Default daily rates document
pub const DEFAULT_CBR_URL: &str = "https://www.cbr-xml-daily.ru/daily_json.js";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tracked currencies, in reporting order
const TRACKED_CURRENCIES: &[&str] = &["USD", "EUR", "CNY", "GBP", "JPY"];

/// Where and how long to fetch the rates document.
#[derive(Clone, Debug)]
pub struct CbrConfig {
    pub url: String,
    pub timeout: Duration,
}

impl Default for CbrConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CBR_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Last successful batch and when it was stored.
struct CachedRates {
    rates: Arc<RateMap>,
    cached_at: DateTime<Utc>,
}

/// Central bank rates adapter with a last-response cache.
///
/// # Example
///
/// ```ignore
/// use findash_market_data::{CbrConfig, CbrRateAdapter, SourceAdapter};
///
/// let adapter = CbrRateAdapter::new(CbrConfig::default());
/// let rates = adapter.fetch_all().await;
/// ```
pub struct CbrRateAdapter {
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    config: CbrConfig,
    cache: RwLock<Option<CachedRates>>,
}

impl CbrRateAdapter {
    /// Create an adapter that talks to the network through `reqwest`.
    pub fn new(config: CbrConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()), Arc::new(SystemClock))
    }

    /// Create an adapter over an explicit transport and clock.
    pub fn with_transport(
        config: CbrConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            clock,
            config,
            cache: RwLock::new(None),
        }
    }

    /// The batch stored by the last decoded response, if any.
    pub fn cached_rates(&self) -> Option<RateMap> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|cached| cached.rates.as_ref().clone())
    }

    /// When the cached batch was stored.
    pub fn cache_timestamp(&self) -> Option<DateTime<Utc>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|cached| cached.cached_at)
    }

    async fn fetch_document(&self) -> Result<Value, MarketDataError> {
        let request =
            FetchRequest::new(PROVIDER_ID, self.config.url.as_str(), self.config.timeout)
                .accept_json();

        self.transport.get(request).await?.into_json(PROVIDER_ID)
    }

    fn store(&self, rates: &RateMap) {
        let entry = CachedRates {
            rates: Arc::new(rates.clone()),
            cached_at: self.clock.now(),
        };
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Some(entry);
    }

    fn degrade(&self, err: MarketDataError) -> RateMap {
        let category = err.category();
        if !category.allows_cache_fallback() {
            error!(provider = PROVIDER_ID, ?category, "Invalidating rates batch: {}", err);
            let empty = RateMap::new();
            self.store(&empty);
            return empty;
        }

        match self.cached_rates() {
            Some(cached) => {
                error!(
                    provider = PROVIDER_ID,
                    ?category,
                    cached = cached.len(),
                    "Failed to fetch rates, serving cached batch: {}",
                    err
                );
                cached
            }
            None => {
                error!(
                    provider = PROVIDER_ID,
                    ?category,
                    "Failed to fetch rates, no cached batch: {}",
                    err
                );
                RateMap::new()
            }
        }
    }
}

#[async_trait]
impl SourceAdapter for CbrRateAdapter {
    type Record = CurrencyRate;

    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_all(&self) -> RateMap {
        let document = match self.fetch_document().await {
            Ok(document) => document,
            Err(e) => return self.degrade(e),
        };

        match parse_rates(&document, self.clock.now()) {
            Ok(rates) => {
                info!(
                    provider = PROVIDER_ID,
                    "Successfully parsed rates for {} currencies",
                    rates.len()
                );
                self.store(&rates);
                rates
            }
            Err(e) => self.degrade(e),
        }
    }

    fn list_supported_keys(&self) -> Vec<String> {
        TRACKED_CURRENCIES.iter().map(|code| code.to_string()).collect()
    }
}

/// Extracts every tracked currency from a rates document.
///
/// Tracked codes missing from `Valute` are skipped. A tracked entry without
/// `Value`/`Previous`, or with a non-numeric one, fails the whole batch.
fn parse_rates(document: &Value, captured_at: DateTime<Utc>) -> Result<RateMap, MarketDataError> {
    let empty = Map::new();
    let valute = match document.get("Valute") {
        None => &empty,
        Some(Value::Object(table)) => table,
        Some(other) => return Err(invalid_value("Valute".to_string(), other)),
    };

    let mut rates = RateMap::new();
    for code in TRACKED_CURRENCIES {
        let Some(entry) = valute.get(*code) else {
            continue;
        };

        let current = numeric_field(entry, code, "Value")?;
        let previous = numeric_field(entry, code, "Previous")?;

        rates.insert(
            code.to_string(),
            CurrencyRate::from_values(code, current, previous, captured_at),
        );
    }

    if rates.len() < TRACKED_CURRENCIES.len() {
        warn!(
            provider = PROVIDER_ID,
            found = rates.len(),
            tracked = TRACKED_CURRENCIES.len(),
            "Some tracked currencies are missing upstream"
        );
    }

    Ok(rates)
}

/// Reads a number from a `Valute` entry, accepting numeric strings too.
fn numeric_field(entry: &Value, code: &str, field: &str) -> Result<f64, MarketDataError> {
    let path = format!("Valute.{}.{}", code, field);
    let value = entry.get(field).ok_or_else(|| MarketDataError::MissingField {
        provider: PROVIDER_ID.to_string(),
        field: path.clone(),
    })?;

    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid_value(path, value)),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| invalid_value(path, value)),
        _ => Err(invalid_value(path, value)),
    }
}

fn invalid_value(field: String, value: &Value) -> MarketDataError {
    MarketDataError::InvalidValue {
        provider: PROVIDER_ID.to_string(),
        field,
        value: value.to_string(),
    }
}
