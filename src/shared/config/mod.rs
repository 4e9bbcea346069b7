//! Client connection configuration
//!
//! Provides the validated configuration a client needs to reach the board
//! server, and a builder for it.

use std::time::Duration;
use thiserror::Error;

/// Default WebSocket endpoint of a local board server
pub const DEFAULT_SOCKET_URL: &str = "ws://127.0.0.1:3001/ws";

/// Fixed delay between reconnection attempts
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(500);

/// Capacity of the client's outbound intent queue
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// WebSocket URL of the board server
    pub socket_url: String,
    /// Delay between reconnection attempts (retries are unbounded)
    pub reconnect_delay: Duration,
    /// Number of intents that can be queued while disconnected
    pub outbound_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            socket_url: DEFAULT_SOCKET_URL.to_string(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.socket_url.starts_with("ws://") || self.socket_url.starts_with("wss://")) {
            return Err(ConfigError::InvalidUrl(self.socket_url.clone()));
        }
        if self.outbound_capacity == 0 {
            return Err(ConfigError::InvalidValue("outbound_capacity"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    socket_url: Option<String>,
    reconnect_delay: Option<Duration>,
    outbound_capacity: Option<usize>,
}

impl AppConfigBuilder {
    /// Set the WebSocket URL
    pub fn socket_url(mut self, url: impl Into<String>) -> Self {
        self.socket_url = Some(url.into());
        self
    }

    /// Set the reconnection delay
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = Some(delay);
        self
    }

    /// Set the outbound queue capacity
    pub fn outbound_capacity(mut self, capacity: usize) -> Self {
        self.outbound_capacity = Some(capacity);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            socket_url: self.socket_url.unwrap_or(defaults.socket_url),
            reconnect_delay: self.reconnect_delay.unwrap_or(defaults.reconnect_delay),
            outbound_capacity: self.outbound_capacity.unwrap_or(defaults.outbound_capacity),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}
