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
    models::{RateResponse, RatesResponse, SupportedCurrencies},
};

#[utoipa::path(get, path = "/rates/cbr", responses((status = 200, description = "All tracked CBR rates")))]
pub async fn get_cbr_rates(State(state): State<Arc<AppState>>) -> Json<RatesResponse> {
    info!("Fetching CBR exchange rates");
    let rates = state.rate_source.fetch_all().await;
    info!("Returning {} CBR rates", rates.len());
    Json(RatesResponse::new(rates))
}

#[utoipa::path(
    get,
    path = "/rates/cbr/{currency}",
    params(("currency" = String, Path, description = "Currency code, case-insensitive")),
    responses(
        (status = 200, description = "Rate for one currency"),
        (status = 404, description = "Currency not supported or absent upstream")
    )
)]
pub async fn get_cbr_rate(
    Path(currency): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RateResponse>> {
    let code = currency.to_uppercase();
    info!("Fetching CBR rate for {}", code);
    let rate = state.rate_source.fetch_one(&code).await.ok_or_else(|| {
        ApiError::NotFound(format!("Currency {} not found or not supported", code))
    })?;
    Ok(Json(RateResponse::from(rate)))
}

#[utoipa::path(get, path = "/currencies/supported", responses((status = 200, description = "Tracked currency codes")))]
pub async fn get_supported_currencies(
    State(state): State<Arc<AppState>>,
) -> Json<SupportedCurrencies> {
    Json(SupportedCurrencies::from(
        state.rate_source.list_supported_keys(),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rates/cbr", get(get_cbr_rates))
        .route("/rates/cbr/{currency}", get(get_cbr_rate))
        .route("/currencies/supported", get(get_supported_currencies))
}
