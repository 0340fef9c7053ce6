// Smart plug status via the vendor cloud API

use std::time::Duration;

use tracing::instrument;

use crate::config::DeviceConfig;
use crate::models::RawDeviceReading;

pub struct DeviceRepo {
    client: reqwest::Client,
    status_url: String,
}

impl DeviceRepo {
    pub fn connect(config: &DeviceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let status_url = format!(
            "{}/devices/{}/status",
            config.base_url.trim_end_matches('/'),
            config.device_id
        );
        Ok(Self { client, status_url })
    }

    /// Fetches one raw status payload. Transport and decode errors are
    /// returned to the poller, which logs and skips the cycle.
    #[instrument(skip(self), fields(repo = "device", operation = "fetch_reading"))]
    pub async fn fetch_reading(&self) -> anyhow::Result<RawDeviceReading> {
        let response = self
            .client
            .get(&self.status_url)
            .send()
            .await?
            .error_for_status()?;
        let reading = response.json::<RawDeviceReading>().await?;
        Ok(reading)
    }

    /// Status URL this repo polls (exposed for GET /api/device).
    pub fn status_url(&self) -> &str {
        &self.status_url
    }
}
