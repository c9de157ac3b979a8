use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// HTTP settings for the page fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Identifying user agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-attempt request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first failed attempt
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Backoff unit; attempt `i` waits `i * backoff_base_ms`
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

/// Settings for one scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Pause between successive page fetches
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,
}

fn default_user_agent() -> String {
    concat!(
        "listing-scout/",
        env!("CARGO_PKG_VERSION"),
        " (+student project)"
    )
    .to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_retries() -> u32 {
    2
}

fn default_backoff_base_ms() -> u64 {
    1000
}

fn default_politeness_delay_ms() -> u64 {
    150
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            politeness_delay_ms: default_politeness_delay_ms(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Total tries per fetch: the first attempt plus `retries`
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay after the failed attempt with 1-based index `attempt`
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_base_ms.saturating_mul(u64::from(attempt)))
    }
}

impl ScrapeConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}
