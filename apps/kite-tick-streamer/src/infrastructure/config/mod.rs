//! Configuration Module
//!
//! Configuration loading for the streamer.

mod settings;

pub use settings::{
    ConfigError, DEFAULT_TICK_LOG_PATH, DEFAULT_TICKER_URL, DEFAULT_TOKEN_STORE_PATH,
    StreamerConfig, TickerSettings, TokenEndpointSettings,
};
