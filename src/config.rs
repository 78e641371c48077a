//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. The dashboard timezone is an
//! explicit fixed UTC offset so that day and week boundaries do not depend
//! on the deployment host's notion of "local".

use chrono::FixedOffset;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::error::{ConfigError, Result};

/// Supported document-store backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Document-store connection settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Which backend to use.
    #[serde(default)]
    pub backend: Backend,
    /// WebSocket endpoint of the remote store. Required for `remote`.
    #[serde(default)]
    pub ws_url: String,
    /// Optional JSON seed file loaded into the memory backend at startup.
    #[serde(default)]
    pub seed: Option<PathBuf>,
    /// Reconnection behavior for the remote backend.
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

/// Backoff settings for the remote store's reconnection loop.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// After this many consecutive failures the subscription degrades to a
    /// failed state instead of retrying forever.
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_consecutive_failures() -> u32 {
    5
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_consecutive_failures: default_max_consecutive_failures(),
        }
    }
}

/// Dashboard aggregation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Fixed UTC offset used for every day/week/month boundary, e.g. "-06:00".
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Daily report count above which the KPI enters the alert state.
    /// The comparison is strict greater-than.
    #[serde(default = "default_daily_alert_threshold")]
    pub daily_alert_threshold: u64,
}

fn default_timezone() -> String {
    "+00:00".to_string()
}

fn default_daily_alert_threshold() -> u64 {
    40
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            daily_alert_threshold: default_daily_alert_threshold(),
        }
    }
}

impl DashboardConfig {
    /// The configured timezone as a chrono offset.
    pub fn offset(&self) -> Result<FixedOffset> {
        self.timezone.parse::<FixedOffset>().map_err(|e| {
            ConfigError::InvalidValue {
                field: "dashboard.timezone",
                reason: format!("expected a UTC offset like \"-06:00\": {e}"),
            }
            .into()
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.offset()?;

        if self.store.backend == Backend::Remote {
            if self.store.ws_url.is_empty() {
                return Err(ConfigError::MissingField { field: "store.ws_url" }.into());
            }
            let url = Url::parse(&self.store.ws_url).map_err(|e| ConfigError::InvalidValue {
                field: "store.ws_url",
                reason: e.to_string(),
            })?;
            if url.scheme() != "ws" && url.scheme() != "wss" {
                return Err(ConfigError::InvalidValue {
                    field: "store.ws_url",
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                }
                .into());
            }
        }

        if self.store.reconnect.backoff_multiplier <= 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "store.reconnect.backoff_multiplier",
                reason: "must be greater than 1.0".to_string(),
            }
            .into());
        }
        if self.store.reconnect.initial_delay_ms == 0
            || self.store.reconnect.max_delay_ms < self.store.reconnect.initial_delay_ms
        {
            return Err(ConfigError::InvalidValue {
                field: "store.reconnect",
                reason: "delays must be positive and max >= initial".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// The configured dashboard timezone as a chrono offset.
    pub fn offset(&self) -> Result<FixedOffset> {
        self.dashboard.offset()
    }

    /// Initialize the global tracing subscriber from the logging section.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}
