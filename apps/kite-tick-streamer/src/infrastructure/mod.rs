//! Infrastructure Layer - Adapters and external integrations.
//!
//! Concrete implementations of the port interfaces defined in the
//! application layer, plus process-wide concerns (config, telemetry).

/// Kite Connect adapters (ticker WebSocket, token endpoint).
pub mod kite;

/// File-backed credential cache.
pub mod store;

/// Append-only tick log.
pub mod writer;

/// Environment configuration.
pub mod config;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// Tracing and OpenTelemetry integration.
pub mod telemetry;
