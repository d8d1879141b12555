//! Configuration loading and constants.
//!
//! Every setting has a default, so the service runs without a config file. A
//! TOML file may override any of them, and the image day can additionally be
//! set through the `FG_IMAGE_DAY` environment variable. `AppConfig` is built
//! once at startup and shared read-only afterwards.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use const_format::formatcp;
use serde::Deserialize;

use crate::resolver::ImageDay;

// =============================================================================
// HTTP Server Defaults
// =============================================================================

/// Default listen host (all interfaces)
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default per-request time limit in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default time to wait for in-flight requests on shutdown, in seconds
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// Routes
// =============================================================================

/// Maintenance window redirect route
pub const WINDOW_ROUTE: &str = "/window/{day}/{hour}";

/// Liveness probe route
pub const ALIVE_ROUTE: &str = "/alive";

/// Prefix of the redirect target; the tag is appended
pub const TAG_PATH_PREFIX: &str = "/tag/";

// =============================================================================
// Environment and Logging
// =============================================================================

/// Environment variable overriding the image day (0-6, Sunday = 0)
pub const IMAGE_DAY_ENV: &str = "FG_IMAGE_DAY";

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str =
    formatcp!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME"));

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Image schedule
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Upper bound on handling a single request, in seconds
    #[serde(default = "HttpServerConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Grace period for in-flight requests on SIGTERM/SIGINT, in seconds
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_seconds: Self::default_request_timeout(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    fn default_request_timeout() -> u64 {
        DEFAULT_REQUEST_TIMEOUT_SECS
    }

    fn default_shutdown_grace() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Validation(format!("invalid http.host or http.port: {}", e)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}

/// When images are produced
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleConfig {
    /// Weekday images are built on, 0-6 with Sunday = 0 (default: Monday)
    #[serde(default)]
    pub image_day: ImageDay,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise starts from the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// An unusable `FG_IMAGE_DAY` is logged and ignored, keeping the image day
    /// already configured.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = lookup(IMAGE_DAY_ENV) else {
            return;
        };

        match parse_image_day(&raw) {
            Ok(image_day) => {
                tracing::debug!(variable = IMAGE_DAY_ENV, %image_day, "Image day set from environment");
                self.schedule.image_day = image_day;
            }
            Err(e) => {
                tracing::warn!(
                    variable = IMAGE_DAY_ENV,
                    value = %raw,
                    error = %e,
                    fallback = %self.schedule.image_day,
                    "Ignoring invalid image day"
                );
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.http.socket_addr()?;

        if self.http.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "http.request_timeout_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parses a Sunday-based day index as found in the environment.
pub fn parse_image_day(raw: &str) -> Result<ImageDay, ConfigError> {
    let index: u32 = raw
        .trim()
        .parse()
        .map_err(|e| ConfigError::ImageDay(format!("{:?} is not a number: {}", raw, e)))?;

    ImageDay::from_index(index)
        .ok_or_else(|| ConfigError::ImageDay(format!("{} is outside 0-6 (Sunday = 0)", index)))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid image day: {0}")]
    ImageDay(String),
    #[error("Configuration error: {0}")]
    Validation(String),
}
