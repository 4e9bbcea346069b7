/**
 * Server Configuration
 *
 * This module handles loading of the board server configuration.
 *
 * # Configuration Sources
 *
 * Values are resolved in this order, later sources winning:
 *
 * 1. Built-in defaults
 * 2. The TOML file named by `CORKBOARD_CONFIG`, if set
 * 3. Environment variables (`PORT`, `BOARD_DATA_PATH`, `FRONTEND_DIST`,
 *    `PERSIST_DEBOUNCE_MS`, `BROADCAST_CAPACITY`)
 *
 * `main` loads `.env` with `dotenv` before calling `ServerConfig::load`.
 *
 * # Example TOML
 *
 * ```toml
 * port = 3001
 * data_path = "data/board.json"
 * frontend_dist = "frontend/dist"
 * persist_debounce_ms = 200
 * broadcast_capacity = 1000
 * ```
 */
use crate::backend::error::BackendError;
use crate::backend::realtime::DEFAULT_BROADCAST_CAPACITY;
use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable naming an optional TOML config file
pub const CONFIG_FILE_ENV: &str = "CORKBOARD_CONFIG";

/// Board server configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port to listen on (all interfaces)
    pub port: u16,
    /// Location of the board snapshot file
    pub data_path: PathBuf,
    /// Directory holding a built web frontend
    pub frontend_dist: PathBuf,
    /// Quiet period before a snapshot is written
    pub persist_debounce_ms: u64,
    /// Broadcast channel capacity
    pub broadcast_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            data_path: PathBuf::from("board.json"),
            frontend_dist: PathBuf::from("frontend/dist"),
            persist_debounce_ms: 200,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the optional TOML file and the environment
    ///
    /// # Errors
    ///
    /// `ConfigError` if the TOML file cannot be read or parsed, or an
    /// environment variable has an invalid value.
    pub fn load() -> Result<Self, BackendError> {
        let mut config = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) => {
                tracing::info!("Loading server configuration from {}", path);
                let raw = std::fs::read_to_string(&path)
                    .map_err(|e| BackendError::config(format!("cannot read {}: {}", path, e)))?;
                Self::from_toml_str(&raw)?
            }
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self, BackendError> {
        toml::from_str(raw).map_err(|e| BackendError::config(e.to_string()))
    }

    /// Override fields from environment-style lookups
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), BackendError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = parse_var("PORT", &port)?;
        }
        if let Some(path) = lookup("BOARD_DATA_PATH") {
            self.data_path = PathBuf::from(path);
        }
        if let Some(dist) = lookup("FRONTEND_DIST") {
            self.frontend_dist = PathBuf::from(dist);
        }
        if let Some(ms) = lookup("PERSIST_DEBOUNCE_MS") {
            self.persist_debounce_ms = parse_var("PERSIST_DEBOUNCE_MS", &ms)?;
        }
        if let Some(capacity) = lookup("BROADCAST_CAPACITY") {
            self.broadcast_capacity = parse_var("BROADCAST_CAPACITY", &capacity)?;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    pub fn index_file(&self) -> PathBuf {
        self.frontend_dist.join("index.html")
    }

    /// Whether a built frontend is available to serve
    pub fn has_frontend(&self) -> bool {
        self.index_file().is_file()
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, BackendError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| BackendError::config(format!("{}={:?}: {}", key, value, e)))
}
