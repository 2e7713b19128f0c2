use std::net::Ipv4Addr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Literals shipped in the example secrets that must be replaced before use.
pub const PLACEHOLDER_CREDENTIALS: &[&str] = &["API_KEY", "MY_SSID", "MY_WIFI_PASSWORD"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config field `{0}` is empty")]
    Missing(&'static str),
    #[error("config field `{field}` still holds the placeholder {value:?}")]
    Placeholder { field: &'static str, value: String },
    #[error("server address {0:?} is not an IPv4 literal")]
    InvalidAddress(String),
    #[error("server port must be non-zero")]
    InvalidPort,
    #[error("invalid poll settings: {0}")]
    InvalidPollSettings(String),
}

/// Printer connection and credentials, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterConfig {
    pub server_name: String,
    pub server_address: String,
    pub server_port: u16,
    pub api_key: String,
    pub wifi_ssid: String,
    pub wifi_password: String,
    #[serde(default)]
    pub poll: PollSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub cadence_ms: u64,
    pub refresh_ms: u64,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub max_backoff_multiplier: u32,
    pub max_body_bytes: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            cadence_ms: 3_000,
            refresh_ms: 1_000,
            request_timeout_ms: 5_000,
            connect_timeout_ms: 3_000,
            max_backoff_multiplier: 8,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl PollSettings {
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }

    pub fn refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let zero = [
            ("cadence_ms", self.cadence_ms),
            ("refresh_ms", self.refresh_ms),
            ("request_timeout_ms", self.request_timeout_ms),
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("max_body_bytes", self.max_body_bytes),
        ]
        .into_iter()
        .find(|(_, value)| *value == 0);
        if let Some((name, _)) = zero {
            return Err(ConfigError::InvalidPollSettings(format!("{name} must be non-zero")));
        }
        if self.max_backoff_multiplier == 0 {
            return Err(ConfigError::InvalidPollSettings(
                "max_backoff_multiplier must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl PrinterConfig {
    /// Rejects empty or placeholder values. Runs once at startup, before any poll.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("server_name", &self.server_name),
            ("server_address", &self.server_address),
            ("api_key", &self.api_key),
            ("wifi_ssid", &self.wifi_ssid),
            ("wifi_password", &self.wifi_password),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(field));
            }
        }

        let credentials = [
            ("api_key", &self.api_key),
            ("wifi_ssid", &self.wifi_ssid),
            ("wifi_password", &self.wifi_password),
        ];
        for (field, value) in credentials {
            if PLACEHOLDER_CREDENTIALS.contains(&value.trim()) {
                return Err(ConfigError::Placeholder {
                    field,
                    value: value.clone(),
                });
            }
        }

        self.address()?;
        if self.server_port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        self.poll.validate()
    }

    pub fn address(&self) -> Result<Ipv4Addr, ConfigError> {
        self.server_address
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.server_address.clone()))
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.server_address.trim(), self.server_port)
    }
}
