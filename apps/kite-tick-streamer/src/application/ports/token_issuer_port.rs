//! Token Issuer Port (Driven Port)
//!
//! Remote source of a fresh credential pair.

use async_trait::async_trait;

use crate::domain::credentials::{CredentialError, CredentialPair};

/// Token issuance error.
#[derive(Debug, thiserror::Error)]
pub enum TokenIssueError {
    /// Transport-level failure.
    #[error("token request failed: {0}")]
    Network(String),

    /// Endpoint answered with a non-success status.
    #[error("token endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Response body could not be decoded.
    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    /// Response decoded but carried an empty value.
    #[error("issued credentials rejected: {0}")]
    Rejected(#[from] CredentialError),
}

/// Port for obtaining a new credential pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenIssuerPort: Send + Sync {
    /// Request one credential pair.
    async fn issue(&self) -> Result<CredentialPair, TokenIssueError>;
}
