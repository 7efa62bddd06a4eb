//! Tick Processor Port (Driven Port)
//!
//! Downstream handler invoked once per tick batch.

use async_trait::async_trait;

use crate::domain::streaming::TickBatch;

/// Tick processing error.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Persisting the batch failed.
    #[error("failed to persist tick batch: {0}")]
    Io(#[from] std::io::Error),

    /// The processor refused the batch.
    #[error("tick batch rejected: {0}")]
    Rejected(String),
}

/// Port for handling tick batches.
///
/// Implementations may be invoked concurrently and in any order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TickProcessorPort: Send + Sync {
    /// Handle one batch.
    async fn process(&self, batch: TickBatch) -> Result<(), ProcessError>;
}
