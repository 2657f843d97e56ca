use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{TimeZone, Utc};
use findash_market_data::{
    CbrConfig, CbrRateAdapter, CurrencyRate, FetchRequest, FetchResponse, HttpTransport,
    MarketDataError, QuoteMap, RateMap, SourceAdapter, StockQuote, SystemClock,
};
use findash_server::{api::app_router, config::Config, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

struct StubRates {
    rates: RateMap,
}

#[async_trait]
impl SourceAdapter for StubRates {
    type Record = CurrencyRate;

    fn id(&self) -> &'static str {
        "CBR"
    }

    async fn fetch_all(&self) -> RateMap {
        self.rates.clone()
    }

    fn list_supported_keys(&self) -> Vec<String> {
        ["USD", "EUR", "CNY", "GBP", "JPY"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

struct StubStocks {
    quotes: QuoteMap,
}

#[async_trait]
impl SourceAdapter for StubStocks {
    type Record = StockQuote;

    fn id(&self) -> &'static str {
        "MOEX"
    }

    async fn fetch_all(&self) -> QuoteMap {
        self.quotes.clone()
    }

    fn list_supported_keys(&self) -> Vec<String> {
        ["SBER", "GAZP", "VTBR", "YNDX", "ROSN", "LKOH", "MGNT"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// Stands in for a bug below the handler layer.
struct ExplodingStocks;

#[async_trait]
impl SourceAdapter for ExplodingStocks {
    type Record = StockQuote;

    fn id(&self) -> &'static str {
        "MOEX"
    }

    async fn fetch_all(&self) -> QuoteMap {
        panic!("quote table corrupted")
    }

    fn list_supported_keys(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Serves one canned CBR document for every request.
struct CannedTransport {
    status: u16,
    body: String,
}

#[async_trait]
impl HttpTransport for CannedTransport {
    async fn get(&self, _request: FetchRequest) -> Result<FetchResponse, MarketDataError> {
        Ok(FetchResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

fn default_config() -> Config {
    Config::from_lookup(|_| None).unwrap()
}

fn sample_rates() -> RateMap {
    let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
    let mut rates = RateMap::new();
    rates.insert(
        "USD".to_string(),
        CurrencyRate::from_values("USD", 91.5, 91.3, ts),
    );
    rates.insert(
        "EUR".to_string(),
        CurrencyRate::from_values("EUR", 99.8, 100.0, ts),
    );
    rates
}

fn sample_quotes() -> QuoteMap {
    let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
    let mut quotes = QuoteMap::new();
    quotes.insert(
        "SBER".to_string(),
        StockQuote::from_prices("SBER", 280.5, 279.0, ts),
    );
    quotes
}

fn app_with(
    config: &Config,
    rates: Arc<dyn SourceAdapter<Record = CurrencyRate>>,
    stocks: Arc<dyn SourceAdapter<Record = StockQuote>>,
) -> Router {
    let state = Arc::new(AppState::new(config, rates, stocks));
    app_router(state, config)
}

fn stub_app() -> Router {
    app_with(
        &default_config(),
        Arc::new(StubRates {
            rates: sample_rates(),
        }),
        Arc::new(StubStocks {
            quotes: sample_quotes(),
        }),
    )
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_works() {
    let response = get(stub_app(), "/api/v1/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn all_rates_envelope() {
    let response = get(stub_app(), "/api/v1/rates/cbr").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["source"], "cbr");
    assert_eq!(body["success"], true);
    assert_eq!(body["currencies_count"], 2);
    assert!(body["timestamp"].is_string());
    assert_eq!(
        body["data"]["USD"],
        json!({
            "currency": "USD/RUB",
            "rate": 91.5,
            "change": 0.2,
            "change_percent": 0.2191,
            "timestamp": "2024-01-15T10:30:00Z"
        })
    );
}

#[tokio::test]
async fn single_rate_is_case_insensitive() {
    let response = get(stub_app(), "/api/v1/rates/cbr/usd").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["source"], "cbr");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["currency"], "USD/RUB");
    assert!(body.get("currencies_count").is_none());
}

#[tokio::test]
async fn unknown_currency_is_404() {
    let response = get(stub_app(), "/api/v1/rates/cbr/xyz").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["code"], 404);
    assert_eq!(body["message"], "Currency XYZ not found or not supported");
}

#[tokio::test]
async fn tracked_but_absent_currency_is_404() {
    // GBP is tracked but missing from the stubbed batch
    let response = get(stub_app(), "/api/v1/rates/cbr/GBP").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn supported_currencies() {
    let body = json_body(get(stub_app(), "/api/v1/currencies/supported").await).await;
    assert_eq!(
        body,
        json!({
            "supported_currencies": ["USD", "EUR", "CNY", "GBP", "JPY"],
            "count": 5
        })
    );
}

#[tokio::test]
async fn all_stocks_envelope() {
    let response = get(stub_app(), "/api/v1/stocks/moex").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["source"], "moex");
    assert_eq!(body["success"], true);
    assert_eq!(body["stocks_count"], 1);
    assert_eq!(body["data"]["SBER"]["ticker"], "SBER");
    assert_eq!(body["data"]["SBER"]["price"], 280.5);
    assert_eq!(body["data"]["SBER"]["change_percent"], 0.54);
    assert_eq!(body["data"]["SBER"]["volume"], 0.0);
}

#[tokio::test]
async fn single_stock_is_case_insensitive() {
    let response = get(stub_app(), "/api/v1/stocks/moex/sber").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["source"], "moex");
    assert_eq!(body["data"]["ticker"], "SBER");
}

#[tokio::test]
async fn unknown_stock_is_404() {
    let response = get(stub_app(), "/api/v1/stocks/moex/AAPL").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["message"], "Stock AAPL not found or not supported");
}

#[tokio::test]
async fn supported_stocks() {
    let body = json_body(get(stub_app(), "/api/v1/stocks/supported").await).await;
    assert_eq!(body["count"], 7);
    assert_eq!(body["supported_stocks"][0], "SBER");
    assert_eq!(body["supported_stocks"][6], "MGNT");
}

#[tokio::test]
async fn handler_panic_becomes_500() {
    let app = app_with(
        &default_config(),
        Arc::new(StubRates {
            rates: sample_rates(),
        }),
        Arc::new(ExplodingStocks),
    );

    let response = get(app, "/api/v1/stocks/moex").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["code"], 500);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("quote table corrupted"));
}

#[tokio::test]
async fn empty_upstream_still_returns_envelope() {
    let app = app_with(
        &default_config(),
        Arc::new(StubRates {
            rates: RateMap::new(),
        }),
        Arc::new(StubStocks {
            quotes: QuoteMap::new(),
        }),
    );

    let body = json_body(get(app.clone(), "/api/v1/rates/cbr").await).await;
    assert_eq!(body["currencies_count"], 0);
    assert_eq!(body["data"], json!({}));
    assert_eq!(body["success"], true);

    let body = json_body(get(app, "/api/v1/stocks/moex").await).await;
    assert_eq!(body["stocks_count"], 0);
    assert_eq!(body["data"], json!({}));
}

#[tokio::test]
async fn rates_flow_through_real_adapter() {
    let document = json!({
        "Date": "2024-01-15T11:30:00+03:00",
        "Valute": {
            "USD": {"CharCode": "USD", "Value": 91.5, "Previous": 91.3},
            "AUD": {"CharCode": "AUD", "Value": 60.1, "Previous": 60.0}
        }
    });
    let adapter = CbrRateAdapter::with_transport(
        CbrConfig::default(),
        Arc::new(CannedTransport {
            status: 200,
            body: document.to_string(),
        }),
        Arc::new(SystemClock),
    );
    let app = app_with(
        &default_config(),
        Arc::new(adapter),
        Arc::new(StubStocks {
            quotes: QuoteMap::new(),
        }),
    );

    let body = json_body(get(app, "/api/v1/rates/cbr").await).await;
    assert_eq!(body["currencies_count"], 1);
    assert_eq!(body["data"]["USD"]["change_percent"], 0.2191);
    assert!(body["data"].get("AUD").is_none());
}

#[tokio::test]
async fn upstream_failure_degrades_to_empty() {
    let adapter = CbrRateAdapter::with_transport(
        CbrConfig::default(),
        Arc::new(CannedTransport {
            status: 503,
            body: String::new(),
        }),
        Arc::new(SystemClock),
    );
    let app = app_with(
        &default_config(),
        Arc::new(adapter),
        Arc::new(StubStocks {
            quotes: QuoteMap::new(),
        }),
    );

    let response = get(app, "/api/v1/rates/cbr").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["currencies_count"], 0);
}

#[tokio::test]
async fn root_and_health() {
    let body = json_body(get(stub_app(), "/").await).await;
    assert_eq!(body["message"], "Welcome to Financial Dashboard");
    assert_eq!(body["status"], "running");
    assert_eq!(body["docs"], "/openapi.json");

    let body = json_body(get(stub_app(), "/health").await).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["cbr_api"], "operational");
    assert_eq!(body["services"]["moex_api"], "operational");
}

#[tokio::test]
async fn openapi_only_in_debug() {
    let response = get(stub_app(), "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["paths"].get("/api/v1/rates/cbr").is_some());

    let config = Config::from_lookup(|key| (key == "FD_DEBUG").then(|| "false".to_string()))
        .unwrap();
    let app = app_with(
        &config,
        Arc::new(StubRates {
            rates: sample_rates(),
        }),
        Arc::new(StubStocks {
            quotes: sample_quotes(),
        }),
    );
    assert_eq!(get(app.clone(), "/openapi.json").await.status(), StatusCode::NOT_FOUND);
    let body = json_body(get(app, "/").await).await;
    assert!(body["docs"].is_null());
}

#[tokio::test]
async fn custom_prefix() {
    let config = Config::from_lookup(|key| (key == "FD_API_PREFIX").then(|| "/v2".to_string()))
        .unwrap();
    let app = app_with(
        &config,
        Arc::new(StubRates {
            rates: sample_rates(),
        }),
        Arc::new(StubStocks {
            quotes: sample_quotes(),
        }),
    );

    assert_eq!(get(app.clone(), "/v2/rates/cbr/EUR").await.status(), StatusCode::OK);
    assert_eq!(get(app, "/api/v1/rates/cbr/EUR").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_paths_follow_custom_prefix() {
    let config = Config::from_lookup(|key| (key == "FD_API_PREFIX").then(|| "/v2".to_string()))
        .unwrap();
    let app = app_with(
        &config,
        Arc::new(StubRates {
            rates: sample_rates(),
        }),
        Arc::new(StubStocks {
            quotes: sample_quotes(),
        }),
    );

    let body = json_body(get(app, "/openapi.json").await).await;
    let paths = body["paths"].as_object().unwrap();
    for path in [
        "/v2/healthz",
        "/v2/rates/cbr",
        "/v2/rates/cbr/{currency}",
        "/v2/currencies/supported",
        "/v2/stocks/moex",
        "/v2/stocks/moex/{ticker}",
        "/v2/stocks/supported",
        "/",
        "/health",
    ] {
        assert!(paths.contains_key(path), "missing {}", path);
    }
    assert!(paths.keys().all(|path| !path.starts_with("/api/v1")));
}

#[tokio::test]
async fn request_id_is_propagated() {
    let response = get(stub_app(), "/api/v1/healthz").await;
    assert!(response.headers().contains_key("x-request-id"));
}
