//! Streamer Configuration Settings
//!
//! Configuration types for the tick streamer, loaded from environment
//! variables once at startup.

use std::path::PathBuf;
use std::time::Duration;

/// Default credential cache path, relative to the working directory.
pub const DEFAULT_TOKEN_STORE_PATH: &str = "__TOKEN_STORE.txt";

/// Default Kite ticker endpoint.
pub const DEFAULT_TICKER_URL: &str = "wss://ws.kite.trade";

/// Default tick log path.
pub const DEFAULT_TICK_LOG_PATH: &str = "ticks.bin";

const DEFAULT_TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Token endpoint settings.
#[derive(Debug, Clone)]
pub struct TokenEndpointSettings {
    /// URL of the token-issuance endpoint.
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
}

/// Ticker connection settings.
#[derive(Debug, Clone)]
pub struct TickerSettings {
    /// WebSocket base URL. Credentials are appended as query parameters.
    pub url: String,
}

impl Default for TickerSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_TICKER_URL.to_string(),
        }
    }
}

/// Complete streamer configuration.
#[derive(Debug, Clone)]
pub struct StreamerConfig {
    /// Token endpoint settings.
    pub token_endpoint: TokenEndpointSettings,
    /// Credential cache file.
    pub token_store_path: PathBuf,
    /// Ticker connection settings.
    pub ticker: TickerSettings,
    /// Output file for tick batches.
    pub tick_log_path: PathBuf,
    /// Prometheus listener port (0 = disabled).
    pub metrics_port: u16,
}

impl StreamerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENDPOINT` is missing, empty or not a URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENDPOINT` is missing, empty or not a URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint =
            lookup("ENDPOINT").ok_or_else(|| ConfigError::MissingEnvVar("ENDPOINT".to_string()))?;

        if endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyValue("ENDPOINT".to_string()));
        }

        reqwest::Url::parse(endpoint.trim()).map_err(|e| ConfigError::InvalidValue {
            key: "ENDPOINT".to_string(),
            reason: e.to_string(),
        })?;

        let token_endpoint = TokenEndpointSettings {
            url: endpoint.trim().to_string(),
            timeout: parse_duration_secs(
                &lookup,
                "TOKEN_REQUEST_TIMEOUT_SECS",
                DEFAULT_TOKEN_REQUEST_TIMEOUT,
            ),
        };

        let token_store_path = lookup("KITE_TOKEN_STORE")
            .filter(|v| !v.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_TOKEN_STORE_PATH), PathBuf::from);

        let ticker = TickerSettings {
            url: lookup("KITE_TICKER_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| TickerSettings::default().url),
        };

        let tick_log_path = lookup("TICK_LOG_PATH")
            .filter(|v| !v.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_TICK_LOG_PATH), PathBuf::from);

        let metrics_port = lookup("STREAMER_METRICS_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Ok(Self {
            token_endpoint,
            token_store_path,
            ticker,
            tick_log_path,
            metrics_port,
        })
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable could not be parsed.
    #[error("environment variable {key} is invalid: {reason}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Parse failure.
        reason: String,
    },
}

fn parse_duration_secs<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}
