#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Kite Tick Streamer - Market Data Capture
//!
//! Opens one authenticated connection to the Kite Connect ticker, subscribes
//! a fixed watchlist of instruments in full mode and hands every binary tick
//! batch to a processing task without blocking the socket reader.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Credentials, instruments and stream event types
//! - **Application**: Ports and the services that drive them
//!   - `ports`: Ticker control, credential store, token issuer, tick processor
//!   - `services`: Credential acquisition, tick dispatch, stream session
//! - **Infrastructure**: Adapters and process-wide concerns
//!   - `kite`: Ticker WebSocket client and token endpoint client
//!   - `store`: Credential cache file
//!   - `writer`: Append-only tick log
//!   - `config`, `metrics`, `telemetry`
//!
//! # Data Flow
//!
//! ```text
//!                      ┌─────────────┐  events  ┌──────────────┐
//! Kite ticker WS ────► │ KiteTicker  │ ───────► │ StreamSession│
//!                      └─────────────┘          └──────┬───────┘
//!                          ▲  subscribe / mode         │ ticks
//!                          └───────────────────────────┤
//!                                                      ▼
//!                                              ┌──────────────┐
//!                                              │TickDispatcher│──► task per batch
//!                                              └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core types with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::credentials::{CredentialError, CredentialPair};
pub use domain::instruments::{
    InstrumentList, InstrumentToken, StreamMode, Subscription, WATCHLIST, WATCHLIST_LEN,
};
pub use domain::streaming::{ConnectionState, StreamEvent, TickBatch};

// Application services
pub use application::services::{
    AcquireError, AcquiredCredentials, CredentialService, CredentialSource, DispatchStats,
    SessionSummary, StreamSession, TickDispatcher,
};

// Infrastructure config
pub use infrastructure::config::{
    ConfigError, StreamerConfig, TickerSettings, TokenEndpointSettings,
};

// Adapters
pub use infrastructure::kite::{HttpTokenIssuer, KiteTicker, KiteTickerConfig, KiteTickerError};
pub use infrastructure::store::FileCredentialStore;
pub use infrastructure::writer::{FileTickWriter, WriterError};

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
