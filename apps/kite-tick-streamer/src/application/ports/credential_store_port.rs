//! Credential Store Port (Driven Port)
//!
//! Persistence for the single cached credential pair.

use crate::domain::credentials::CredentialPair;

/// Credential store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("credential store I/O error at {path}: {source}")]
    Io {
        /// Backing file path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Port for loading and saving the cached credential pair.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStorePort: Send + Sync {
    /// Load the cached pair.
    ///
    /// Returns `Ok(None)` when nothing usable is cached.
    fn load(&self) -> Result<Option<CredentialPair>, StoreError>;

    /// Persist a pair, replacing any previous one.
    fn save(&self, pair: &CredentialPair) -> Result<(), StoreError>;
}
