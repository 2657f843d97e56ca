use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Json, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{config::Config, error::handle_panic, main_lib::AppState};

pub mod health;
pub mod rates;
pub mod stocks;

/// Routes mounted under the configured API prefix; paths are prefix-relative.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        rates::get_cbr_rates,
        rates::get_cbr_rate,
        rates::get_supported_currencies,
        stocks::get_moex_stocks,
        stocks::get_moex_stock,
        stocks::get_supported_stocks
    ),
    tags((name = "findash", description = "Currency rates and share quotes"))
)]
pub struct ApiDoc;

/// Routes served at the root regardless of the prefix.
#[derive(OpenApi)]
#[openapi(paths(health::root, health::health_check))]
pub struct ServiceDoc;

/// Builds the served document with every API path mounted under `api_prefix`.
pub fn openapi_document(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut api = ApiDoc::openapi();
    api.paths.paths = std::mem::take(&mut api.paths.paths)
        .into_iter()
        .map(|(path, item)| (format!("{}{}", api_prefix, path), item))
        .collect();

    let mut doc = ServiceDoc::openapi();
    doc.merge(api);
    doc
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let api = Router::new()
        .route("/healthz", get(health::healthz))
        .merge(rates::router())
        .merge(stocks::router());

    let mut router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check));
    router = if config.api_prefix.is_empty() {
        router.merge(api)
    } else {
        router.nest(&config.api_prefix, api)
    };
    if config.debug {
        let openapi = openapi_document(&config.api_prefix);
        router = router.route("/openapi.json", get(|| async { Json(openapi) }));
    }

    router
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(config))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
}
