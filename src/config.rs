//! Configuration loading and constants.
//!
//! Loads application configuration from a TOML file and defines the defaults
//! for the HTTP listener, JSON body parsing, and logging. `AppConfig` is the
//! root configuration struct; every section is optional so the service also
//! runs with no file at all.

use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Listener Defaults
// =============================================================================

/// Default bind address
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default bind port
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Time allowed for in-flight requests to finish after a shutdown signal
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// JSON Body Parsing
// =============================================================================

/// Largest JSON request body accepted (100 KiB)
pub const DEFAULT_JSON_BODY_LIMIT: usize = 100 * 1024;

/// Media type handled by the JSON body middleware
pub const JSON_MEDIA_TYPE: &str = "application/json";

// =============================================================================
// Response Headers
// =============================================================================

/// Health responses must never be served from an intermediary cache
pub const CACHE_CONTROL_HEALTH: &str = "no-store";

/// Response header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "ci_starter=debug";

/// Greeting returned from the root route
pub const ROOT_GREETING: &str = "Hello from Express CI Starter 👋";

/// Liveness probe path
pub const HEALTH_PATH: &str = "/health";

/// Liveness probe path as written by probes configured with a trailing slash
pub const HEALTH_PATH_SLASH: &str = "/health/";

/// Status reported by the health route
pub const HEALTH_STATUS_OK: &str = "ok";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// JSON request body parsing
    #[serde(default)]
    pub body: JsonBodyConfig,
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
    /// Seconds to drain connections on shutdown (default: 30)
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
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
    fn default_shutdown_grace() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }
}

/// JSON body parser settings
#[derive(Debug, Clone, Deserialize)]
pub struct JsonBodyConfig {
    /// Maximum body size in bytes (default: 100 KiB)
    #[serde(default = "JsonBodyConfig::default_limit")]
    pub limit_bytes: usize,
    /// Reject top-level values other than objects and arrays (default: true)
    #[serde(default = "JsonBodyConfig::default_strict")]
    pub strict: bool,
}

impl Default for JsonBodyConfig {
    fn default() -> Self {
        Self {
            limit_bytes: Self::default_limit(),
            strict: Self::default_strict(),
        }
    }
}

impl JsonBodyConfig {
    fn default_limit() -> usize {
        DEFAULT_JSON_BODY_LIMIT
    }
    fn default_strict() -> bool {
        true
    }
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
        Self::parse(&contents)
    }

    /// Load the explicitly named file, or fall back to built-in defaults when
    /// the default path does not exist.
    pub fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        if path == DEFAULT_CONFIG_PATH && !Path::new(path).exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.body.limit_bytes == 0 {
            return Err(ConfigError::Validation(
                "body.limit_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
