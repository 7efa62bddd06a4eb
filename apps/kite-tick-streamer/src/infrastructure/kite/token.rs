//! Token Endpoint Adapter
//!
//! Implements `TokenIssuerPort` with a single HTTP GET against the
//! configured token endpoint. The endpoint answers with either an ordered
//! pair or an object:
//!
//! ```json
//! ["<access_token>", "<api_key>"]
//! {"access_token": "<access_token>", "api_key": "<api_key>"}
//! ```

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{TokenIssueError, TokenIssuerPort};
use crate::domain::credentials::CredentialPair;
use crate::infrastructure::config::TokenEndpointSettings;

/// Token issuer backed by an HTTP endpoint.
#[derive(Debug)]
pub struct HttpTokenIssuer {
    client: reqwest::Client,
    url: String,
}

impl HttpTokenIssuer {
    /// Create a new issuer.
    pub fn new(settings: &TokenEndpointSettings) -> Result<Self, TokenIssueError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| TokenIssueError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: settings.url.clone(),
        })
    }
}

#[async_trait]
impl TokenIssuerPort for HttpTokenIssuer {
    async fn issue(&self) -> Result<CredentialPair, TokenIssueError> {
        tracing::info!(url = %self.url, "Requesting credentials from token endpoint");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| TokenIssueError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TokenIssueError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenIssueError::InvalidResponse(e.to_string()))?;

        Ok(body.into_pair()?)
    }
}

// API response types

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenResponse {
    Pair(String, String),
    Fields { access_token: String, api_key: String },
}

impl TokenResponse {
    fn into_pair(self) -> Result<CredentialPair, crate::domain::credentials::CredentialError> {
        match self {
            Self::Pair(access_token, api_key)
            | Self::Fields {
                access_token,
                api_key,
            } => CredentialPair::new(access_token, api_key),
        }
    }
}
