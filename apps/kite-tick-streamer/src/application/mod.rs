//! Application Layer - Use cases and port definitions.
//!
//! The session reacts to stream events through the ports; the services
//! here never touch sockets or files directly.

/// Port interfaces for the ticker, credential store, issuer and processor.
pub mod ports;

/// Credential acquisition, tick dispatch and the stream session.
pub mod services;
