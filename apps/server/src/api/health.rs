use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{
    main_lib::AppState,
    models::{HealthStatus, RootInfo, ServiceStatus},
};

const OPERATIONAL: &str = "operational";

#[utoipa::path(get, path = "/", responses((status = 200, description = "Service banner")))]
pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootInfo> {
    Json(RootInfo {
        message: format!("Welcome to {}", state.project_name),
        version: state.version.clone(),
        status: "running",
        timestamp: Utc::now(),
        docs: state.debug.then_some("/openapi.json"),
    })
}

/// Static report; upstreams are not probed.
#[utoipa::path(get, path = "/health", responses((status = 200, description = "Service health")))]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        timestamp: Utc::now(),
        version: state.version.clone(),
        services: ServiceStatus {
            api: OPERATIONAL,
            cbr_api: OPERATIONAL,
            moex_api: OPERATIONAL,
        },
    })
}

#[utoipa::path(get, path = "/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}
