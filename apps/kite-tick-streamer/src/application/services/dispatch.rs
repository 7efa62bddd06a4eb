//! Tick Dispatch
//!
//! Hands each tick batch to the processor on its own spawned task and
//! returns immediately. Tasks are never bounded or retried, so batches may
//! complete in any order. They are tracked so that shutdown can wait for
//! the ones still running.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio_util::task::TaskTracker;

use crate::application::ports::TickProcessorPort;
use crate::domain::streaming::TickBatch;
use crate::infrastructure::metrics;

/// Counters for dispatched tick batches.
#[derive(Debug, Default)]
pub struct DispatchStats {
    dispatched: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl DispatchStats {
    /// Batches handed to a task.
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Batches the processor accepted.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Batches the processor failed on.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Batches whose task has not finished yet.
    #[must_use]
    pub fn in_flight(&self) -> u64 {
        self.dispatched()
            .saturating_sub(self.completed())
            .saturating_sub(self.failed())
    }
}

/// Fire-and-forget dispatcher for tick batches.
#[derive(Clone)]
pub struct TickDispatcher {
    processor: Arc<dyn TickProcessorPort>,
    stats: Arc<DispatchStats>,
    tasks: TaskTracker,
}

impl TickDispatcher {
    /// Create a dispatcher over the given processor.
    #[must_use]
    pub fn new(processor: Arc<dyn TickProcessorPort>) -> Self {
        Self {
            processor,
            stats: Arc::new(DispatchStats::default()),
            tasks: TaskTracker::new(),
        }
    }

    /// Shared counters.
    #[must_use]
    pub fn stats(&self) -> Arc<DispatchStats> {
        Arc::clone(&self.stats)
    }

    /// Spawn a task that processes `batch`. Does not wait for it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&self, batch: TickBatch) {
        self.stats.dispatched.fetch_add(1, Ordering::Relaxed);
        metrics::record_batch_dispatched();

        let processor = Arc::clone(&self.processor);
        let stats = Arc::clone(&self.stats);

        self.tasks.spawn(async move {
            let started = Instant::now();
            let bytes = batch.len();

            match processor.process(batch).await {
                Ok(()) => {
                    stats.completed.fetch_add(1, Ordering::Relaxed);
                    metrics::record_processing_duration(started.elapsed());
                }
                Err(e) => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    metrics::record_processing_failure();
                    tracing::warn!(error = %e, bytes, "Tick batch processing failed");
                }
            }
        });
    }

    /// Wait for every dispatched batch to finish processing.
    ///
    /// Batches dispatched after this returns are still processed but no
    /// longer waited for by a later `drain`.
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        tracing::debug!(
            completed = self.stats.completed(),
            failed = self.stats.failed(),
            "Tick processing drained"
        );
    }
}
