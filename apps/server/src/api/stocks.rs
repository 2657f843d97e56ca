use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{StockResponse, StocksResponse, SupportedStocks},
};

#[utoipa::path(get, path = "/stocks/moex", responses((status = 200, description = "All tracked MOEX quotes")))]
pub async fn get_moex_stocks(State(state): State<Arc<AppState>>) -> Json<StocksResponse> {
    info!("Fetching MOEX stock quotes");
    let quotes = state.stock_source.fetch_all().await;
    info!("Returning {} MOEX quotes", quotes.len());
    Json(StocksResponse::new(quotes))
}

#[utoipa::path(
    get,
    path = "/stocks/moex/{ticker}",
    params(("ticker" = String, Path, description = "Security ticker, case-insensitive")),
    responses(
        (status = 200, description = "Quote for one ticker"),
        (status = 404, description = "Ticker not supported or absent upstream")
    )
)]
pub async fn get_moex_stock(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StockResponse>> {
    let ticker = ticker.to_uppercase();
    info!("Fetching MOEX quote for {}", ticker);
    let quote = state
        .stock_source
        .fetch_one(&ticker)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Stock {} not found or not supported", ticker)))?;
    Ok(Json(StockResponse::from(quote)))
}

#[utoipa::path(get, path = "/stocks/supported", responses((status = 200, description = "Tracked tickers")))]
pub async fn get_supported_stocks(State(state): State<Arc<AppState>>) -> Json<SupportedStocks> {
    Json(SupportedStocks::from(state.stock_source.list_supported_keys()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stocks/moex", get(get_moex_stocks))
        .route("/stocks/moex/{ticker}", get(get_moex_stock))
        .route("/stocks/supported", get(get_supported_stocks))
}
