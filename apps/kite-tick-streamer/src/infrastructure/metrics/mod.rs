//! Prometheus Metrics Module
//!
//! Exposes streamer metrics in Prometheus format.
//!
//! # Metrics Categories
//!
//! - **Ticks**: batches received, dispatched and failed
//! - **Connection**: ticker connection state
//! - **Credentials**: where the credential pair came from
//! - **Latency**: tick batch processing time
//!
//! # Integration
//!
//! When `STREAMER_METRICS_PORT` is non-zero, metrics are served at
//! `/metrics` on that port. Otherwise the recording calls are no-ops.

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::domain::streaming::ConnectionState;

static INSTALLED: OnceLock<SocketAddr> = OnceLock::new();

/// Install the Prometheus recorder and its HTTP listener.
///
/// Returns the listener address, or `None` when `port` is 0. Subsequent
/// calls return the first address. Must be called inside a Tokio runtime.
pub fn init_metrics(port: u16) -> Result<Option<SocketAddr>, BuildError> {
    if port == 0 {
        return Ok(None);
    }
    if let Some(addr) = INSTALLED.get() {
        return Ok(Some(*addr));
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    register_metrics();

    Ok(Some(*INSTALLED.get_or_init(|| addr)))
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "kite_streamer_tick_batches_received_total",
        "Tick batches received from the ticker"
    );
    describe_counter!(
        "kite_streamer_tick_bytes_received_total",
        "Tick payload bytes received from the ticker"
    );
    describe_counter!(
        "kite_streamer_tick_batches_dispatched_total",
        "Tick batches handed to a processing task"
    );
    describe_counter!(
        "kite_streamer_tick_processing_failures_total",
        "Tick batches the processor failed on"
    );
    describe_gauge!(
        "kite_streamer_connection_state",
        "Ticker connection state (0=disconnected 1=connecting 2=connected 3=closed)"
    );
    describe_counter!(
        "kite_streamer_credentials_acquired_total",
        "Credential pairs acquired, by source"
    );
    describe_histogram!(
        "kite_streamer_tick_processing_seconds",
        "Time to process one tick batch"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Record a tick batch received from the ticker.
pub fn record_batch_received(bytes: usize) {
    counter!("kite_streamer_tick_batches_received_total").increment(1);
    counter!("kite_streamer_tick_bytes_received_total").increment(bytes as u64);
}

/// Record a tick batch handed to a processing task.
pub fn record_batch_dispatched() {
    counter!("kite_streamer_tick_batches_dispatched_total").increment(1);
}

/// Record a failed tick batch.
pub fn record_processing_failure() {
    counter!("kite_streamer_tick_processing_failures_total").increment(1);
}

/// Record tick batch processing duration.
pub fn record_processing_duration(duration: Duration) {
    histogram!("kite_streamer_tick_processing_seconds").record(duration.as_secs_f64());
}

/// Update the connection state gauge.
pub fn set_connection_state(state: ConnectionState) {
    gauge!("kite_streamer_connection_state").set(state.as_gauge());
}

/// Record the source of the acquired credentials.
pub fn record_credentials_acquired(source: &'static str) {
    counter!("kite_streamer_credentials_acquired_total", "source" => source).increment(1);
}

// =============================================================================
// Tests
// =============================================================================
