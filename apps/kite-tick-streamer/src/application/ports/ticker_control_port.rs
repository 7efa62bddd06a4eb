//! Ticker Control Port (Driven Port)
//!
//! Requests the session sends to the live ticker connection.

use async_trait::async_trait;

use crate::domain::instruments::{InstrumentToken, StreamMode};

/// Ticker control error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickerError {
    /// The connection is not accepting requests.
    #[error("ticker is not connected")]
    NotConnected,

    /// The ticker was stopped and cannot be used again.
    #[error("ticker has been stopped")]
    Stopped,
}

/// Port for controlling the ticker connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TickerControlPort: Send + Sync {
    /// Subscribe to the given instruments.
    async fn subscribe(&self, tokens: &[InstrumentToken]) -> Result<(), TickerError>;

    /// Set the streaming mode for the given instruments.
    async fn set_mode(&self, mode: StreamMode, tokens: &[InstrumentToken])
    -> Result<(), TickerError>;

    /// Stop the ticker. No reconnection happens afterwards.
    async fn stop(&self) -> Result<(), TickerError>;
}
