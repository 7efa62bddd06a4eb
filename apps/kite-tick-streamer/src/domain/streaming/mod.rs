//! Streaming Types
//!
//! Events delivered by the ticker connection and the connection state
//! machine. Tick payloads are carried as opaque bytes and never decoded.

use chrono::{DateTime, Utc};

// =============================================================================
// Tick Batch
// =============================================================================

/// One push message worth of ticks, exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickBatch {
    payload: Vec<u8>,
    received_at: DateTime<Utc>,
}

impl TickBatch {
    /// Wrap a payload received now.
    #[must_use]
    pub fn new(payload: Vec<u8>) -> Self {
        Self::received_at(payload, Utc::now())
    }

    /// Wrap a payload with an explicit receive time.
    #[must_use]
    pub const fn received_at(payload: Vec<u8>, received_at: DateTime<Utc>) -> Self {
        Self {
            payload,
            received_at,
        }
    }

    /// Raw payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the batch, returning the payload.
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Local receive timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

// =============================================================================
// Stream Events
// =============================================================================

/// Lifecycle events emitted by a ticker connection.
///
/// Each event is delivered exactly once, in the order the connection
/// observed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Handshake completed; the connection accepts control requests.
    Connected,
    /// A batch of ticks arrived.
    Ticks(TickBatch),
    /// The server closed the connection.
    Closed {
        /// Close code sent by the server, if any.
        code: Option<u16>,
        /// Close reason sent by the server (may be empty).
        reason: String,
    },
}

impl StreamEvent {
    /// Short event name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Ticks(_) => "ticks",
            Self::Closed { .. } => "closed",
        }
    }
}

// =============================================================================
// Connection State
// =============================================================================

/// State of the single ticker connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not yet connected.
    #[default]
    Disconnected,
    /// `connect` called, handshake in progress.
    Connecting,
    /// Handshake completed.
    Connected,
    /// Terminal. Closed by the server, by `stop`, or by a failure.
    Closed,
}

impl ConnectionState {
    /// Whether moving to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Disconnected, Self::Connecting | Self::Closed)
                | (Self::Connecting, Self::Connected | Self::Closed)
                | (Self::Connected, Self::Closed)
        )
    }

    /// Whether the connection is established.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Whether this is the terminal state.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// State name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Closed => "closed",
        }
    }

    /// Numeric encoding for the connection state gauge.
    #[must_use]
    pub const fn as_gauge(self) -> f64 {
        match self {
            Self::Disconnected => 0.0,
            Self::Connecting => 1.0,
            Self::Connected => 2.0,
            Self::Closed => 3.0,
        }
    }
}
