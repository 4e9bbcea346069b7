use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Environment variable overriding the socket URL
pub const SOCKET_URL_ENV: &str = "CORKBOARD_SOCKET_URL";

/// Client configuration wrapper.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Defaults, with the socket URL taken from `CORKBOARD_SOCKET_URL` if set
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder();
        if let Ok(url) = std::env::var(SOCKET_URL_ENV) {
            builder = builder.socket_url(url);
        }
        Self::with_builder(builder)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
        })
    }

    pub fn socket_url(&self) -> &str {
        &self.app.socket_url
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn into_app(self) -> AppConfig {
        self.app
    }
}
