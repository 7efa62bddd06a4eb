//! Credential Acquisition
//!
//! Reuses the cached credential pair when one exists, otherwise issues a new
//! pair exactly once and writes it back to the cache.

use std::sync::Arc;

use crate::application::ports::{CredentialStorePort, StoreError, TokenIssueError, TokenIssuerPort};
use crate::domain::credentials::CredentialPair;

/// Where the credentials in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Read from the local cache.
    Cache,
    /// Freshly issued by the token endpoint.
    Issued,
}

impl CredentialSource {
    /// Source name for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Issued => "issued",
        }
    }
}

/// Credentials ready for client construction.
#[derive(Debug, Clone)]
pub struct AcquiredCredentials {
    /// The credential pair.
    pub pair: CredentialPair,
    /// Where it came from.
    pub source: CredentialSource,
}

/// Credential acquisition error. All variants are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    /// Reading or writing the cache failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The token endpoint failed.
    #[error(transparent)]
    Issue(#[from] TokenIssueError),
}

/// Loads cached credentials or issues and caches new ones.
pub struct CredentialService {
    store: Arc<dyn CredentialStorePort>,
    issuer: Arc<dyn TokenIssuerPort>,
}

impl CredentialService {
    /// Create a new service.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStorePort>, issuer: Arc<dyn TokenIssuerPort>) -> Self {
        Self { store, issuer }
    }

    /// Acquire the process credential pair.
    ///
    /// A cached pair is used as-is with no freshness check. Without one, the
    /// issuer is called once and its pair is persisted before returning.
    pub async fn acquire(&self) -> Result<AcquiredCredentials, AcquireError> {
        if let Some(pair) = self.store.load()? {
            tracing::info!(api_key = pair.api_key(), "Using cached credentials");
            return Ok(AcquiredCredentials {
                pair,
                source: CredentialSource::Cache,
            });
        }

        tracing::info!("No cached credentials, requesting a new token");
        let pair = self.issuer.issue().await?;
        self.store.save(&pair)?;
        tracing::info!(api_key = pair.api_key(), "Issued credentials cached");

        Ok(AcquiredCredentials {
            pair,
            source: CredentialSource::Issued,
        })
    }
}
