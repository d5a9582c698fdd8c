//! Configuration management for outage-sync
//!
//! This module handles loading, parsing, and validating application configuration
//! from YAML files and environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::backoff::BackoffPolicy;
use crate::models::timestamp;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Synchronization target
    #[serde(default)]
    pub sync: SyncConfig,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(yaml);
        // An empty document deserializes to unit, not to a map
        if expanded.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(&expanded)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))
    }

    /// Load configuration from environment variables with prefix OUTAGE_SYNC_
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from OUTAGE_SYNC_ environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(base_uri) = std::env::var("OUTAGE_SYNC_BASE_URI") {
            self.api.base_uri = base_uri;
        }
        if let Ok(api_key) = std::env::var("OUTAGE_SYNC_API_KEY") {
            self.api.api_key = Some(api_key);
        }
        if let Ok(timeout) = std::env::var("OUTAGE_SYNC_TIMEOUT_SECS") {
            self.api.timeout_secs = timeout
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid timeout seconds".to_string()))?;
        }

        if let Ok(site_id) = std::env::var("OUTAGE_SYNC_SITE_ID") {
            self.sync.site_id = site_id;
        }
        if let Ok(cutoff) = std::env::var("OUTAGE_SYNC_CUTOFF") {
            self.sync.cutoff = cutoff;
        }

        if let Ok(level) = std::env::var("OUTAGE_SYNC_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Check that the configuration can drive a synchronization run
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.api.api_key {
            None => return Err(ConfigError::MissingRequired("api.api_key".to_string())),
            Some(key) if key.trim().is_empty() => {
                return Err(ConfigError::InvalidValue(
                    "api.api_key must not be blank".to_string(),
                ))
            }
            Some(_) => {}
        }

        reqwest::Url::parse(self.api.base_uri.trim()).map_err(|e| {
            ConfigError::InvalidValue(format!("api.base_uri '{}': {}", self.api.base_uri, e))
        })?;

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "api.timeout_secs must be at least 1".to_string(),
            ));
        }

        if self.sync.site_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "sync.site_id must not be blank".to_string(),
            ));
        }

        self.sync.cutoff_timestamp()?;
        self.retry.to_policy()?;

        Ok(())
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URI of the outage API
    #[serde(default = "default_base_uri")]
    pub base_uri: String,

    /// API key sent with every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-attempt request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Per-attempt request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_uri() -> String {
    "https://api.krakenflex.systems/interview-tests-mock-api/v1".to_string()
}

fn default_timeout() -> u64 {
    10
}

/// Synchronization target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    /// Site whose outages are synchronized
    #[serde(default = "default_site_id")]
    pub site_id: String,

    /// Outages beginning before this instant are dropped
    #[serde(default = "default_cutoff")]
    pub cutoff: String,
}

impl SyncConfig {
    /// Parse the cutoff
    pub fn cutoff_timestamp(&self) -> Result<chrono::DateTime<chrono::FixedOffset>, ConfigError> {
        timestamp::parse(&self.cutoff)
            .map_err(|e| ConfigError::InvalidValue(format!("sync.cutoff: {}", e.message())))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            site_id: default_site_id(),
            cutoff: default_cutoff(),
        }
    }
}

fn default_site_id() -> String {
    "norwich-pear-tree".to_string()
}

fn default_cutoff() -> String {
    "2022-01-01T00:00:00.000Z".to_string()
}

/// Retry configuration for remote API calls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryConfig {
    /// Delay before the first retry, in delay units
    #[serde(default = "default_first_delay")]
    pub first_delay: u64,

    /// Length of one delay unit in milliseconds
    #[serde(default = "default_delay_unit_ms")]
    pub delay_unit_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_factor")]
    pub factor: f64,

    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl RetryConfig {
    /// Build the backoff policy
    pub fn to_policy(&self) -> Result<BackoffPolicy, ConfigError> {
        BackoffPolicy::new(
            self.first_delay,
            Duration::from_millis(self.delay_unit_ms),
            self.factor,
            self.max_retries,
        )
        .map_err(|e| ConfigError::InvalidValue(format!("retry: {}", e.message())))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            first_delay: default_first_delay(),
            delay_unit_ms: default_delay_unit_ms(),
            factor: default_factor(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_first_delay() -> u64 {
    1
}

fn default_delay_unit_ms() -> u64 {
    1000
}

fn default_factor() -> f64 {
    2.0
}

fn default_max_retries() -> u32 {
    3
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (`pretty` or `json`)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Configuration error types
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read configuration file: {0}")]
    FileRead(String),

    /// Error parsing configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

/// Expand `${VAR_NAME}` references; unset variables are left as written
fn expand_env_vars(input: &str) -> String {
    let re = match regex_lite::Regex::new(r"\$\{([^}]+)\}") {
        Ok(re) => re,
        Err(_) => return input.to_string(),
    };

    re.replace_all(input, |caps: &regex_lite::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}
