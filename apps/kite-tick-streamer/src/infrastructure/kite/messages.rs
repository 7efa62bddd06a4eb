//! Kite Ticker Messages
//!
//! Control requests sent as JSON text frames, and the JSON postbacks the
//! server sends as text frames.
//!
//! # Control Requests
//!
//! ```json
//! {"a":"subscribe","v":[408065,884737]}
//! {"a":"mode","v":["full",[408065,884737]]}
//! ```
//!
//! # Postbacks
//!
//! ```json
//! {"type":"error","data":"Invalid token"}
//! {"type":"order","data":{...}}
//! ```
//!
//! Binary frames carry tick batches; a frame of exactly one byte is a
//! server heartbeat.

use serde::{Deserialize, Serialize};

use crate::domain::instruments::{InstrumentToken, StreamMode};

/// Length of a heartbeat binary frame.
pub const HEARTBEAT_FRAME_LEN: usize = 1;

/// Whether a binary frame is a server heartbeat rather than ticks.
#[must_use]
pub const fn is_heartbeat(frame: &[u8]) -> bool {
    frame.len() == HEARTBEAT_FRAME_LEN
}

/// Control request sent to the ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "a", content = "v", rename_all = "lowercase")]
pub enum ControlRequest {
    /// Subscribe to instruments.
    Subscribe(Vec<InstrumentToken>),
    /// Set the streaming mode of instruments.
    Mode(StreamMode, Vec<InstrumentToken>),
}

impl ControlRequest {
    /// Request name for logs.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Subscribe(_) => "subscribe",
            Self::Mode(..) => "mode",
        }
    }

    /// Number of instruments carried.
    #[must_use]
    pub fn instrument_count(&self) -> usize {
        match self {
            Self::Subscribe(tokens) | Self::Mode(_, tokens) => tokens.len(),
        }
    }

    /// Serialize the request to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (should not happen with valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// JSON postback received as a text frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Postback {
    /// Postback type (`error`, `order`, `message`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Type-specific payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Postback {
    /// Parse a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is not a JSON postback.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Whether the server reported an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == "error"
    }
}
