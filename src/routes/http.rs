// GET handlers: version, api/device, api/consumption

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::aggregation::{self, Granularity};
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/device — returns the monitored device's static identity from config.
pub(super) async fn device_info_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "deviceId": state.config.device.device_id,
        "baseUrl": state.config.device.base_url,
        "sampleIntervalSecs": state.config.monitoring.sample_interval_secs,
    }))
}

/// GET /api/consumption/{granularity} — time-bucketed aggregates over the
/// full sample history. Unknown granularity is a 400; an empty store is a
/// 500 with an error body (clients poll until the first sample lands).
pub(super) async fn consumption_handler(
    Path(granularity): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let granularity = match granularity.parse::<Granularity>() {
        Ok(g) => g,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                axum::Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let samples = state.store.snapshot();
    match aggregation::aggregate(&samples, granularity) {
        Ok(reports) => axum::Json(reports).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
