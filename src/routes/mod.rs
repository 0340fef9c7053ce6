// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::models::Sample;
use crate::store::SampleStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) live_tx: broadcast::Sender<Sample>,
    pub(crate) store: Arc<SampleStore>,
    pub(crate) ws_live_connections: Arc<AtomicUsize>,
    pub(crate) config: AppConfig,
}

pub fn app(
    live_tx: broadcast::Sender<Sample>,
    store: Arc<SampleStore>,
    ws_live_connections: Arc<AtomicUsize>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        live_tx,
        store,
        ws_live_connections,
        config,
    };
    Router::new()
        .route("/", get(|| async { "Express: Hello from Rust powermon!" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/device", get(http::device_info_handler)) // GET /api/device
        .route(
            "/api/consumption/{granularity}",
            get(http::consumption_handler),
        ) // GET /api/consumption/{granularity}
        .route("/ws/live", get(ws::ws_live)) // WS /ws/live
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
