//! Domain Layer - Core streaming types.
//!
//! Pure types for credentials, instruments and stream events. Nothing here
//! performs I/O.

/// Access token and API key.
pub mod credentials;

/// Instrument tokens, stream modes and the built-in watchlist.
pub mod instruments;

/// Tick batches, stream events and connection state.
pub mod streaming;
