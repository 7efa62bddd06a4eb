//! Tick Log Writer
//!
//! Appends every tick batch to a binary log file as one record:
//!
//! ```text
//! | received_at: i64 LE (unix nanos) | len: u32 LE | payload: len bytes |
//! ```
//!
//! Records are written whole under a lock. Their order follows task
//! completion, not arrival.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::application::ports::{ProcessError, TickProcessorPort};
use crate::domain::streaming::TickBatch;

/// Size of the fixed record header.
pub const RECORD_HEADER_LEN: usize = 12;

/// Writer setup errors.
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// The log file could not be opened.
    #[error("failed to open tick log {path}: {source}")]
    Open {
        /// Log file path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Tick processor that persists batches to an append-only file.
#[derive(Debug)]
pub struct FileTickWriter {
    file: Mutex<File>,
}

impl FileTickWriter {
    /// Open (or create) the log at `path` for appending.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, WriterError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| WriterError::Open {
                path: path.display().to_string(),
                source,
            })?;

        tracing::info!(path = %path.display(), "Tick log opened");

        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

#[async_trait]
impl TickProcessorPort for FileTickWriter {
    async fn process(&self, batch: TickBatch) -> Result<(), ProcessError> {
        let record = encode_record(&batch)?;

        let mut file = self.file.lock().await;
        file.write_all(&record).await?;
        file.flush().await?;

        Ok(())
    }
}

/// Encode one batch as a log record.
pub fn encode_record(batch: &TickBatch) -> Result<Vec<u8>, ProcessError> {
    let len = u32::try_from(batch.len())
        .map_err(|_| ProcessError::Rejected(format!("batch of {} bytes too large", batch.len())))?;
    let nanos = batch.timestamp().timestamp_nanos_opt().unwrap_or_default();

    let mut record = Vec::with_capacity(RECORD_HEADER_LEN + batch.len());
    record.extend_from_slice(&nanos.to_le_bytes());
    record.extend_from_slice(&len.to_le_bytes());
    record.extend_from_slice(batch.payload());
    Ok(record)
}

/// Decode every complete record in a log buffer.
///
/// A truncated trailing record is ignored.
#[must_use]
pub fn decode_records(mut buf: &[u8]) -> Vec<TickBatch> {
    let mut batches = Vec::new();

    while buf.len() >= RECORD_HEADER_LEN {
        let (nanos, rest) = buf.split_at(8);
        let (len, rest) = rest.split_at(4);

        let nanos = i64::from_le_bytes(nanos.try_into().unwrap_or_default());
        let len = u32::from_le_bytes(len.try_into().unwrap_or_default()) as usize;

        if rest.len() < len {
            break;
        }

        let (payload, rest) = rest.split_at(len);
        batches.push(TickBatch::received_at(
            payload.to_vec(),
            DateTime::<Utc>::from_timestamp_nanos(nanos),
        ));
        buf = rest;
    }

    batches
}
