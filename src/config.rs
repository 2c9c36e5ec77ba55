use serde::Deserialize;
use std::fs;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// WebSocket endpoint of the upstream analysis service
    pub endpoint: String,

    /// Capacity of the result/status broadcast bus
    pub bus_capacity: usize,

    /// Seconds without channel events before an awaiting batch is
    /// considered complete (the protocol has no completion signal)
    pub quiet_period_secs: u64,

    /// Fixed seed for the scenario/forensic random draws. Leave unset for
    /// entropy seeding; set it for reproducible runs.
    pub rng_seed: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Self {
        let config_path = "config.yaml";
        let content = fs::read_to_string(config_path).expect("Failed to read config.yaml");

        // Strip BOM if present
        let content = content.strip_prefix("\u{feff}").unwrap_or(&content);

        let config: AppConfig = serde_yaml::from_str(content).expect("Failed to parse config.yaml");
        config
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_secs(self.quiet_period_secs)
    }
}
