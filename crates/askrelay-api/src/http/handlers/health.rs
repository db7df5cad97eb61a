//! GET /health - Liveness plus a check that the provider key is still set.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let key_ok = (state.key_check)(state.provider_kind);

    let (status, label, api_key) = if key_ok {
        (StatusCode::OK, "ok", "present")
    } else {
        tracing::error!(provider = %state.provider_kind, "Provider API key is missing");
        (StatusCode::INTERNAL_SERVER_ERROR, "error", "missing")
    };

    (
        status,
        Json(json!({
            "status": label,
            "checks": {
                "api_key": api_key,
                "provider": state.provider_kind.to_string(),
            }
        })),
    )
}
