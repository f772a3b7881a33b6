//! Console configuration. The scoring backend owns the blocking threshold;
//! nothing here overrides it.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default scoring backend root.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1";
/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "FRAUD_API_URL";
/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "FRAUD_CONSOLE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Scoring backend connection
    pub api: ApiConfig,
    /// Live feed timer and display window
    pub live: LiveConfig,
    /// Aggregation parameters
    pub analytics: AnalyticsConfig,
    /// Retrain status polling
    pub retrain: RetrainConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Whole-request timeout (milliseconds)
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Re-fetch interval while running (milliseconds)
    pub interval_ms: u64,
    /// Displayed log size; older entries are evicted, never un-counted
    pub window: usize,
    /// Per-batch deadline; expiry stops the feed like any other failure
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Length of the top-blocked table
    pub top_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrainConfig {
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

/// Outcome of [`ConsoleConfig::load_with_source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// No file at the path.
    Defaults,
    /// File present but unreadable or unparseable; defaults used.
    Unreadable(String),
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            live: LiveConfig::default(),
            analytics: AnalyticsConfig::default(),
            retrain: RetrainConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            request_timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
        }
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1500,
            window: 100,
            request_timeout_ms: 5_000,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

impl Default for RetrainConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl LiveConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl RetrainConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl ConsoleConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        Self::load_with_source(path).0
    }

    /// Like [`ConsoleConfig::load`], also reporting where the values came from so the
    /// caller can log a fallback once logging is up.
    pub fn load_with_source(path: &std::path::Path) -> (Self, ConfigSource) {
        if !path.exists() {
            return (Self::default(), ConfigSource::Defaults);
        }
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|data| {
                serde_json::from_str::<ConsoleConfig>(&data).map_err(|e| e.to_string())
            });
        match parsed {
            Ok(c) => (c, ConfigSource::File),
            Err(reason) => (Self::default(), ConfigSource::Unreadable(reason)),
        }
    }

    /// Apply environment overrides (currently only the backend URL).
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_api_url(std::env::var(API_URL_ENV).ok());
        self
    }

    fn apply_api_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }
}
