use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/ping", get(ping))
}

/// Full health check — verifies store connectivity.
async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.repo().ping().await?;

    Ok(Json(json!({
        "status": "ok",
        "store": "connected",
    })))
}

/// Lightweight ping — no store check.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
