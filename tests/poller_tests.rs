// Poller integration test: mock vendor API, tick, shutdown; samples land in
// the store normalized and are broadcast to live subscribers.

use axum::{Json, Router, routing::get};
use powermon::config::DeviceConfig;
use powermon::device_repo::DeviceRepo;
use powermon::models::{RawDeviceReading, RawLocation, Sample};
use powermon::poller::{PollerConfig, PollerDeps, ingest, spawn};
use powermon::store::SampleStore;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;

fn raw_reading(update_time: &str) -> RawDeviceReading {
    RawDeviceReading {
        switch: "on".into(),
        voltage: 236.2,
        current: 0.41,
        power: 948.0,
        update_time: update_time.into(),
        location: RawLocation {
            country: "Kuwait".into(),
            town: "Salmiya".into(),
        },
    }
}

#[test]
fn ingest_appends_normalized_sample() {
    let store = SampleStore::new();
    let sample = ingest(&store, &raw_reading("2023-06-15 12:00:03"), 10).unwrap();
    assert_eq!(sample.watts, 94.8);
    assert_eq!(store.len(), 1);
}

#[test]
fn ingest_drops_malformed_reading_without_append() {
    let store = SampleStore::new();
    assert!(ingest(&store, &raw_reading("not-a-timestamp"), 10).is_none());
    assert!(store.is_empty());
}

/// Serves a canned status payload the way the vendor cloud does.
async fn spawn_mock_device() -> String {
    let app = Router::new().route(
        "/devices/plug-01/status",
        get(|| async {
            Json(serde_json::json!({
                "switch": "on",
                "voltage": 236.2,
                "current": 0.41,
                "power": 948.0,
                "updateTime": "2023-06-15 12:00:03",
                "location": { "country": "Kuwait", "town": "Salmiya" }
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

fn device_config(base_url: String, device_id: &str) -> DeviceConfig {
    DeviceConfig {
        base_url,
        device_id: device_id.into(),
        timeout_secs: 2,
    }
}

#[tokio::test]
async fn device_repo_fetches_and_decodes_status() {
    let base_url = spawn_mock_device().await;
    let repo = DeviceRepo::connect(&device_config(base_url, "plug-01")).unwrap();
    let reading = repo.fetch_reading().await.unwrap();
    assert_eq!(reading.switch, "on");
    assert_eq!(reading.power, 948.0);
    assert_eq!(reading.update_time, "2023-06-15 12:00:03");
}

#[tokio::test]
async fn device_repo_surfaces_http_errors() {
    let base_url = spawn_mock_device().await;
    let repo = DeviceRepo::connect(&device_config(base_url, "unknown-device")).unwrap();
    assert!(repo.fetch_reading().await.is_err());
}

#[tokio::test]
async fn poller_ingests_and_broadcasts_normalized_samples() {
    let base_url = spawn_mock_device().await;
    let device_repo = Arc::new(DeviceRepo::connect(&device_config(base_url, "plug-01")).unwrap());
    let store = Arc::new(SampleStore::new());
    let (tx, mut rx) = broadcast::channel::<Sample>(10);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        PollerDeps {
            device_repo,
            store: store.clone(),
            tx,
            ws_live_connections: Arc::new(AtomicUsize::new(0)),
            shutdown_rx,
        },
        PollerConfig {
            sample_interval_secs: 1,
            stats_log_interval_secs: 60,
        },
    );

    let sample = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
        .await
        .expect("sample broadcast within 5s")
        .expect("broadcast recv");
    assert_eq!(sample.watts, 94.8);
    assert_eq!(sample.watt_hours, 94.8 * (1.0 / 3600.0));
    assert!(sample.switch_status);
    assert!(!store.is_empty());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn poller_skips_failed_cycles_without_stopping() {
    // No device behind this port; every cycle fails, the task stays up
    let device_repo = Arc::new(
        DeviceRepo::connect(&device_config("http://127.0.0.1:9".into(), "plug-01")).unwrap(),
    );
    let store = Arc::new(SampleStore::new());
    let (tx, _) = broadcast::channel::<Sample>(10);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        PollerDeps {
            device_repo,
            store: store.clone(),
            tx,
            ws_live_connections: Arc::new(AtomicUsize::new(0)),
            shutdown_rx,
        },
        PollerConfig {
            sample_interval_secs: 1,
            stats_log_interval_secs: 60,
        },
    );

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
    assert!(!handle.is_finished());
    assert!(store.is_empty());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
