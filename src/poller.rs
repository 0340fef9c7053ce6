// Background ingestion worker (same cadence as the original poller).
// Each tick: fetch the device status, normalize it, append to the store,
// broadcast to /ws/live subscribers. A failed cycle is logged and skipped;
// the cadence is never interrupted.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, interval};

use crate::device_repo::DeviceRepo;
use crate::models::{RawDeviceReading, Sample};
use crate::store::SampleStore;

/// Rate limit for "no receivers" logging (avoid logging every tick when no one is on /ws/live)
const NO_RECEIVERS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Repos, channels, and shutdown for the poller.
pub struct PollerDeps {
    pub device_repo: Arc<DeviceRepo>,
    pub store: Arc<SampleStore>,
    pub tx: broadcast::Sender<Sample>,
    pub ws_live_connections: Arc<AtomicUsize>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Poller timing and logging config.
/// Stats logging uses a real-time interval, independent of the sample cadence.
pub struct PollerConfig {
    /// Poll period; also the interval the watt-hour derivation assumes.
    pub sample_interval_secs: u64,
    pub stats_log_interval_secs: u64,
}

/// Normalizes one raw reading into the store. A malformed payload is logged
/// and dropped (nothing is appended); the caller's cadence is unaffected.
pub fn ingest(
    store: &SampleStore,
    reading: &RawDeviceReading,
    sampling_interval_secs: u64,
) -> Option<Sample> {
    match Sample::from_reading(reading, sampling_interval_secs) {
        Ok(sample) => {
            store.append(sample.clone());
            Some(sample)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                operation = "normalize_reading",
                "malformed device payload"
            );
            None
        }
    }
}

pub fn spawn(deps: PollerDeps, config: PollerConfig) -> tokio::task::JoinHandle<()> {
    let PollerDeps {
        device_repo,
        store,
        tx,
        ws_live_connections,
        mut shutdown_rx,
    } = deps;
    let PollerConfig {
        sample_interval_secs,
        stats_log_interval_secs,
    } = config;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(sample_interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut samples_ingested_total: u64 = 0;
        let mut last_no_receivers_log: Option<Instant> = None;

        let poller_span = tracing::span!(tracing::Level::DEBUG, "poller", sample_interval_secs);
        let _guard = poller_span.enter();

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let reading = match device_repo.fetch_reading().await {
                        Ok(r) => r,
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                operation = "fetch_reading",
                                "device poll failed"
                            );
                            continue;
                        }
                    };
                    let Some(sample) = ingest(&store, &reading, sample_interval_secs) else {
                        continue;
                    };
                    samples_ingested_total += 1;

                    if tx.send(sample).is_err() {
                        let should_log = last_no_receivers_log
                            .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_LOG_INTERVAL);
                        if should_log {
                            tracing::debug!(
                                operation = "broadcast_sample",
                                "No active WebSocket clients; broadcast channel has no receivers"
                            );
                            last_no_receivers_log = Some(Instant::now());
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Poller shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        ws_live_clients =
                            ws_live_connections.load(std::sync::atomic::Ordering::Relaxed),
                        samples_ingested_total,
                        samples_in_store = store.len(),
                        "app stats"
                    );
                }
            }
        }
    })
}
