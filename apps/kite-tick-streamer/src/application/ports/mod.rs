//! Application Ports (Driven)
//!
//! Interfaces the streaming session depends on. Infrastructure adapters
//! implement them; tests substitute fakes.
//!
//! - `CredentialStorePort`: load/save the cached credential pair
//! - `TokenIssuerPort`: obtain a fresh credential pair
//! - `TickerControlPort`: control requests on the live ticker connection
//! - `TickProcessorPort`: downstream handling of one tick batch

mod credential_store_port;
mod tick_processor_port;
mod ticker_control_port;
mod token_issuer_port;

pub use credential_store_port::{CredentialStorePort, StoreError};
pub use tick_processor_port::{ProcessError, TickProcessorPort};
pub use ticker_control_port::{TickerControlPort, TickerError};
pub use token_issuer_port::{TokenIssueError, TokenIssuerPort};

#[cfg(test)]
pub use credential_store_port::MockCredentialStorePort;
#[cfg(test)]
pub use tick_processor_port::MockTickProcessorPort;
#[cfg(test)]
pub use ticker_control_port::MockTickerControlPort;
#[cfg(test)]
pub use token_issuer_port::MockTokenIssuerPort;
