use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub device: DeviceConfig,
    pub publishing: PublishingConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Vendor cloud API root, e.g. "https://api.example-plugs.io/v2".
    pub base_url: String,
    pub device_id: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of samples kept in the broadcast channel for /ws/live (slow clients may lag).
    pub broadcast_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Device poll period; also the interval watt-hours are derived from.
    pub sample_interval_secs: u64,
    /// How often to log app stats (samples ingested, ws_live clients) at INFO level.
    pub stats_log_interval_secs: u64,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.device.base_url.is_empty(),
            "device.base_url must be non-empty"
        );
        anyhow::ensure!(
            !self.device.device_id.is_empty(),
            "device.device_id must be non-empty"
        );
        anyhow::ensure!(
            self.device.timeout_secs > 0,
            "device.timeout_secs must be > 0, got {}",
            self.device.timeout_secs
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        anyhow::ensure!(
            self.monitoring.sample_interval_secs > 0,
            "monitoring.sample_interval_secs must be > 0, got {}",
            self.monitoring.sample_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}
