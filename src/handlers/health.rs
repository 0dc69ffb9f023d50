use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "mannmitra-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness gates on the database only: the provider adapters degrade to
/// their local fallbacks, so their configuration is reported but never
/// blocks traffic.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    let provider_mode = |configured: bool| if configured { "configured" } else { "fallback_mode" };
    let checks = json!({
        "database": if db_ok { "ok" } else { "failed" },
        "gemini_ai": provider_mode(state.ai.is_some()),
        "speech": provider_mode(state.speech.is_some()),
    });

    if db_ok {
        (
            StatusCode::OK,
            Json(json!({ "status": "ready", "checks": checks })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "checks": checks })),
        )
    }
}
