//! Kite Connect Adapters
//!
//! - **Ticker**: WebSocket client for the streaming endpoint
//! - **Messages**: control requests and postbacks (JSON codec)
//! - **Token**: HTTP client for the token-issuance endpoint

pub mod messages;
pub mod ticker;
pub mod token;

pub use messages::{ControlRequest, Postback, is_heartbeat};
pub use ticker::{KiteTicker, KiteTickerConfig, KiteTickerError};
pub use token::HttpTokenIssuer;
