//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub summary: SummaryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Empty means any origin is allowed
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Front-end client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the insights API (without the `/api` prefix)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport-level timeout; the controller itself never times out
    #[serde(default = "default_client_timeout")]
    pub request_timeout_secs: u64,

    /// Sent as `X-Scramble-Id` on chat requests
    #[serde(default)]
    pub scramble_id: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_client_timeout() -> u64 {
    60
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_client_timeout(),
            scramble_id: None,
        }
    }
}

/// Chat assistant configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Generation endpoint; unused unless `model` is also set
    #[serde(default)]
    pub url: Option<String>,

    /// Model name; when absent the echo assistant answers
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default = "default_assistant_timeout")]
    pub request_timeout_secs: u64,
}

fn default_assistant_timeout() -> u64 {
    30
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            url: None,
            model: None,
            request_timeout_secs: default_assistant_timeout(),
        }
    }
}

/// Summary metrics served by `/api/insights-summary/`
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_metrics")]
    pub metrics: serde_json::Map<String, serde_json::Value>,
}

fn default_metrics() -> serde_json::Map<String, serde_json::Value> {
    let mut metrics = serde_json::Map::new();
    metrics.insert("prior_day_total_orders".into(), 1234.into());
    metrics.insert("prior_day_on_time_rate".into(), 0.93.into());
    metrics.insert("mtd_total_orders".into(), 28976.into());
    metrics.insert("mtd_on_time_rate".into(), 0.91.into());
    metrics.insert("prediction_today_total_orders".into(), 1340.into());
    metrics.insert("prediction_today_on_time_rate".into(), 0.94.into());
    metrics
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
        }
    }
}

/// Logging configuration
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
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, or the default locations, or environment
    ///
    /// An explicit path that fails to load is an error; the default
    /// locations are only tried best-effort. Nothing is logged here, since
    /// the subscriber is configured from the result; call
    /// [`ConfigSource::log`] once logging is up.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        match explicit {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                Ok((config, ConfigSource::File(path.to_path_buf())))
            }
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> (Self, ConfigSource) {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("insights-hub").join("config.toml")),
            Some(PathBuf::from("/etc/insights-hub/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing path that parses, else fall back to environment
    fn load_first(paths: &[PathBuf]) -> (Self, ConfigSource) {
        let mut skipped = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => return (config, ConfigSource::File(path.clone())),
                Err(e) => skipped.push(e),
            }
        }

        (Self::from_env(), ConfigSource::Defaults { skipped })
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(host) = lookup("INSIGHTS_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("INSIGHTS_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Client overrides
        if let Some(url) = lookup("INSIGHTS_BASE_URL") {
            self.client.base_url = url;
        }
        if let Some(id) = lookup("INSIGHTS_SCRAMBLE_ID") {
            self.client.scramble_id = Some(id);
        }

        // Assistant overrides
        if let Some(url) = lookup("INSIGHTS_ASSISTANT_URL") {
            self.assistant.url = Some(url);
        }
        if let Some(model) = lookup("INSIGHTS_ASSISTANT_MODEL") {
            self.assistant.model = Some(model);
        }

        // Logging overrides
        if let Some(level) = lookup("INSIGHTS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("INSIGHTS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Where a resolved configuration came from
#[derive(Debug)]
pub enum ConfigSource {
    File(PathBuf),
    /// No usable file; `skipped` holds files that exist but failed to load
    Defaults { skipped: Vec<ConfigError> },
}

impl ConfigSource {
    /// Report the outcome of config resolution
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => tracing::info!("Loaded config from {:?}", path),
            ConfigSource::Defaults { skipped } => {
                for e in skipped {
                    tracing::warn!("Skipped config file: {}", e);
                }
                tracing::info!("Using default config with environment overrides");
            }
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Insights Hub Configuration
#
# Environment variables override these settings:
# - INSIGHTS_API_HOST
# - INSIGHTS_API_PORT
# - INSIGHTS_BASE_URL
# - INSIGHTS_SCRAMBLE_ID
# - INSIGHTS_ASSISTANT_URL
# - INSIGHTS_ASSISTANT_MODEL
# - INSIGHTS_LOG_LEVEL
# - INSIGHTS_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8000

# Allowed CORS origins (empty = any origin)
cors_origins = []

[client]
# Insights API base URL used by insights-cli
base_url = "http://localhost:8000"

# Transport timeout in seconds
request_timeout_secs = 60

# Caller identity sent as X-Scramble-Id
# scramble_id = "jdoe"

[assistant]
# Generation endpoint and model; without a model the echo assistant answers
# url = "http://localhost:9000/v1/generate"
# model = "text-bison"

# Timeout for generation requests in seconds
request_timeout_secs = 30

[summary.metrics]
prior_day_total_orders = 1234
prior_day_on_time_rate = 0.93
mtd_total_orders = 28976
mtd_on_time_rate = 0.91
prediction_today_total_orders = 1340
prediction_today_on_time_rate = 0.94

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
