// WebSocket handler: live stream of ingested samples

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::models::Sample;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Decrements ws_live connection count on drop (connect = +1, drop = -1).
struct WsLiveGuard(Arc<AtomicUsize>);

impl Drop for WsLiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
    }
}

pub(super) async fn ws_live(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let tx = state.live_tx.clone();
    let conn_count = state.ws_live_connections.clone();
    let device_id = state.config.device.device_id.clone();
    ws.on_upgrade(move |socket| async move {
        let mut rx = tx.subscribe();
        if let Err(e) = stream_live(socket, &mut rx, conn_count, device_id).await {
            tracing::info!("Live stream error: {}", e);
        }
    })
}

async fn stream_live(
    mut socket: WebSocket,
    rx: &mut broadcast::Receiver<Sample>,
    conn_count: Arc<AtomicUsize>,
    device_id: String,
) -> anyhow::Result<()> {
    conn_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let _guard = WsLiveGuard(conn_count);
    tracing::info!("Client connected to live stream");

    let welcome = serde_json::json!({ "type": "info", "deviceId": device_id });
    let welcome_json = serde_json::to_string(&welcome)?;
    let r = timeout(
        WS_SEND_TIMEOUT,
        socket.send(Message::Text(welcome_json.into())),
    )
    .await;
    if r.is_err() || r.unwrap_or(Ok(())).is_err() {
        return Ok(());
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(sample) => {
                        let json = serde_json::to_string(&sample)?;
                        let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
                        if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("WebSocket /ws/live client lagged, skipped {} messages", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}
