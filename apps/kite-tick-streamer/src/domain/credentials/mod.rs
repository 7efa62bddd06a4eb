//! Credential Pair
//!
//! The access token and API key that authenticate the ticker connection.
//! Exactly one pair exists per process; it is never refreshed.

use thiserror::Error;

/// Credential validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// A credential field was empty.
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

/// Kite access token and API key.
///
/// `Debug` and `Display` never print the access token.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPair {
    access_token: String,
    api_key: String,
}

impl CredentialPair {
    /// Create a credential pair.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is empty after trimming.
    pub fn new(
        access_token: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let access_token = access_token.into().trim().to_string();
        let api_key = api_key.into().trim().to_string();

        if access_token.is_empty() {
            return Err(CredentialError::Empty("access token"));
        }
        if api_key.is_empty() {
            return Err(CredentialError::Empty("API key"));
        }

        Ok(Self {
            access_token,
            api_key,
        })
    }

    /// Get the access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Get the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"[REDACTED]")
            .field("api_key", &self.api_key)
            .finish()
    }
}

impl std::fmt::Display for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialPair(api_key={})", self.api_key)
    }
}
