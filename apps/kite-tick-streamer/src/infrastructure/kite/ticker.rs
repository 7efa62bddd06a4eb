//! Kite Ticker WebSocket Client
//!
//! Single connection to the Kite Connect streaming endpoint.
//!
//! # Stream URL
//!
//! `wss://ws.kite.trade?api_key=...&access_token=...`
//!
//! # Lifecycle
//!
//! `connect` blocks until the connection ends and reports everything it
//! sees as [`StreamEvent`]s. Control requests (subscribe, mode) go through
//! [`TickerControlPort`] and are written by the connection loop. There is
//! no reconnection: once closed or stopped, the client stays closed.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_util::sync::CancellationToken;

use super::messages::{ControlRequest, Postback, is_heartbeat};
use crate::application::ports::{TickerControlPort, TickerError};
use crate::domain::credentials::CredentialPair;
use crate::domain::instruments::{InstrumentToken, StreamMode};
use crate::domain::streaming::{ConnectionState, StreamEvent, TickBatch};
use crate::infrastructure::metrics;

/// Kite Connect API version sent on the handshake.
const KITE_VERSION: &str = "3";

// =============================================================================
// Error Type
// =============================================================================

/// Errors that can occur in the ticker client.
#[derive(Debug, thiserror::Error)]
pub enum KiteTickerError {
    /// Ticker URL could not be built.
    #[error("invalid ticker URL: {0}")]
    InvalidUrl(String),

    /// The server rejected the API key or access token.
    #[error("ticker rejected the API key or access token")]
    InvalidCredentials,

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// Control request could not be encoded.
    #[error("failed to encode control request: {0}")]
    Encode(#[from] serde_json::Error),

    /// `connect` was already called on this client.
    #[error("ticker connection already started")]
    AlreadyStarted,

    /// The client was stopped.
    #[error("ticker has been stopped")]
    Stopped,
}

impl KiteTickerError {
    fn from_handshake(err: WsError) -> Self {
        match err {
            WsError::Http(ref response) if response.status().as_u16() == 403 => {
                Self::InvalidCredentials
            }
            other => Self::WebSocket(other),
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the ticker client.
#[derive(Debug, Clone)]
pub struct KiteTickerConfig {
    /// WebSocket base URL, without credentials.
    pub url: String,
}

impl KiteTickerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl From<&crate::TickerSettings> for KiteTickerConfig {
    fn from(settings: &crate::TickerSettings) -> Self {
        Self::new(settings.url.clone())
    }
}

// =============================================================================
// Ticker Client
// =============================================================================

/// Kite ticker client for one streaming connection.
pub struct KiteTicker {
    config: KiteTickerConfig,
    request: Mutex<Option<Request>>,
    state: RwLock<ConnectionState>,
    command_tx: mpsc::UnboundedSender<ControlRequest>,
    command_rx: Mutex<Option<mpsc::UnboundedReceiver<ControlRequest>>>,
    stop: CancellationToken,
}

impl KiteTicker {
    /// Create a client for the given credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the handshake request cannot be built from the
    /// URL and credentials.
    pub fn new(
        config: KiteTickerConfig,
        credentials: &CredentialPair,
    ) -> Result<Self, KiteTickerError> {
        let request = handshake_request(&config.url, credentials)?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            request: Mutex::new(Some(request)),
            state: RwLock::new(ConnectionState::Disconnected),
            command_tx,
            command_rx: Mutex::new(Some(command_rx)),
            stop: CancellationToken::new(),
        })
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Whether `stop` has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Connect and run until the connection ends.
    ///
    /// Events are pushed into `events` as they happen. Returns `Ok(())` when
    /// the server closes the connection or the client is stopped.
    ///
    /// # Errors
    ///
    /// Fails if the client was stopped or already started, if the handshake
    /// fails, or on a transport error.
    pub async fn connect(
        &self,
        events: mpsc::UnboundedSender<StreamEvent>,
    ) -> Result<(), KiteTickerError> {
        if self.is_stopped() {
            return Err(KiteTickerError::Stopped);
        }

        let request = self.request.lock().take();
        let commands = self.command_rx.lock().take();
        let (Some(request), Some(mut commands)) = (request, commands) else {
            return Err(KiteTickerError::AlreadyStarted);
        };

        self.set_state(ConnectionState::Connecting);
        tracing::info!(url = %self.config.url, "Connecting to Kite ticker");

        let ws_stream = tokio::select! {
            () = self.stop.cancelled() => {
                self.set_state(ConnectionState::Closed);
                return Ok(());
            }
            result = tokio_tungstenite::connect_async(request) => match result {
                Ok((ws_stream, _response)) => ws_stream,
                Err(e) => {
                    self.set_state(ConnectionState::Closed);
                    return Err(KiteTickerError::from_handshake(e));
                }
            }
        };

        self.set_state(ConnectionState::Connected);
        tracing::info!("Kite ticker connected");
        let _ = events.send(StreamEvent::Connected);

        let (mut write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                () = self.stop.cancelled() => {
                    tracing::info!("Ticker stopped, closing connection");
                    let _ = write.send(Message::Close(None)).await;
                    self.set_state(ConnectionState::Closed);
                    return Ok(());
                }
                Some(request) = commands.recv() => {
                    let json = request.to_json()?;
                    tracing::debug!(
                        action = request.action(),
                        instruments = request.instrument_count(),
                        "Sending control request"
                    );
                    if let Err(e) = write.send(Message::Text(json.into())).await {
                        self.fail(&events, &e);
                        return Err(e.into());
                    }
                }
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Binary(data))) => {
                            if is_heartbeat(&data) {
                                tracing::trace!("Ticker heartbeat");
                            } else {
                                metrics::record_batch_received(data.len());
                                let _ = events.send(StreamEvent::Ticks(TickBatch::new(data.to_vec())));
                            }
                        }
                        Some(Ok(Message::Text(text))) => {
                            handle_postback(text.as_str());
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = write.send(Message::Pong(data)).await {
                                self.fail(&events, &e);
                                return Err(e.into());
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame.map_or((None, String::new()), |f| {
                                (Some(u16::from(f.code)), f.reason.as_str().to_owned())
                            });
                            tracing::info!(?code, reason = %reason, "Server sent close frame");
                            self.set_state(ConnectionState::Closed);
                            let _ = events.send(StreamEvent::Closed { code, reason });
                            return Ok(());
                        }
                        Some(Ok(_)) => {
                            // Pong and raw frames carry nothing for us
                        }
                        Some(Err(e)) => {
                            self.fail(&events, &e);
                            return Err(e.into());
                        }
                        None => {
                            tracing::info!("WebSocket stream ended");
                            self.set_state(ConnectionState::Closed);
                            let _ = events.send(StreamEvent::Closed {
                                code: None,
                                reason: "stream ended".to_string(),
                            });
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Move to `Closed` after a transport failure and report it as a close.
    fn fail(&self, events: &mpsc::UnboundedSender<StreamEvent>, error: &WsError) {
        tracing::error!(error = %error, "Ticker connection failed");
        self.set_state(ConnectionState::Closed);
        let _ = events.send(StreamEvent::Closed {
            code: None,
            reason: error.to_string(),
        });
    }

    fn set_state(&self, next: ConnectionState) {
        let mut state = self.state.write();
        if !state.can_transition_to(next) {
            tracing::debug!(
                from = state.as_str(),
                to = next.as_str(),
                "Ignoring connection state transition"
            );
            return;
        }
        *state = next;
        metrics::set_connection_state(next);
    }

    fn send_request(&self, request: ControlRequest) -> Result<(), TickerError> {
        if self.is_stopped() {
            return Err(TickerError::Stopped);
        }
        if !self.state().is_connected() {
            return Err(TickerError::NotConnected);
        }
        self.command_tx
            .send(request)
            .map_err(|_| TickerError::NotConnected)
    }
}

#[async_trait]
impl TickerControlPort for KiteTicker {
    async fn subscribe(&self, tokens: &[InstrumentToken]) -> Result<(), TickerError> {
        self.send_request(ControlRequest::Subscribe(tokens.to_vec()))
    }

    async fn set_mode(
        &self,
        mode: StreamMode,
        tokens: &[InstrumentToken],
    ) -> Result<(), TickerError> {
        self.send_request(ControlRequest::Mode(mode, tokens.to_vec()))
    }

    async fn stop(&self) -> Result<(), TickerError> {
        if !self.stop.is_cancelled() {
            tracing::info!("Stopping ticker, reconnection disabled");
            self.stop.cancel();
        }
        // Not connected yet means the connection loop will never run.
        if matches!(self.state(), ConnectionState::Disconnected) {
            self.set_state(ConnectionState::Closed);
        }
        Ok(())
    }
}

fn handshake_request(base: &str, credentials: &CredentialPair) -> Result<Request, KiteTickerError> {
    let url = reqwest::Url::parse_with_params(
        base,
        &[
            ("api_key", credentials.api_key()),
            ("access_token", credentials.access_token()),
        ],
    )
    .map_err(|e| KiteTickerError::InvalidUrl(e.to_string()))?;

    let mut request = url.as_str().into_client_request()?;
    request
        .headers_mut()
        .insert("X-Kite-Version", HeaderValue::from_static(KITE_VERSION));
    Ok(request)
}

fn handle_postback(text: &str) {
    match Postback::parse(text) {
        Ok(postback) if postback.is_error() => {
            tracing::warn!(data = %postback.data, "Ticker error postback");
        }
        Ok(postback) => {
            tracing::debug!(kind = %postback.kind, "Ticker postback");
        }
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unrecognized text frame");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> CredentialPair {
        CredentialPair::new("access token", "api_key").unwrap()
    }

    #[test]
    fn handshake_request_carries_credentials_and_version() {
        let request = handshake_request("wss://ws.kite.trade", &credentials()).unwrap();

        let query = request.uri().query().unwrap();
        assert!(query.contains("api_key=api_key"));
        assert!(query.contains("access_token=access+token"));
        assert_eq!(request.headers()["X-Kite-Version"], "3");
    }

    #[test]
    fn invalid_url_fails_construction() {
        let result = KiteTicker::new(KiteTickerConfig::new("not a url"), &credentials());
        assert!(matches!(result, Err(KiteTickerError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn requests_rejected_before_connect() {
        let ticker =
            KiteTicker::new(KiteTickerConfig::new("ws://127.0.0.1:1"), &credentials()).unwrap();

        assert_eq!(ticker.state(), ConnectionState::Disconnected);
        assert_eq!(
            ticker.subscribe(&[InstrumentToken::new(1)]).await,
            Err(TickerError::NotConnected)
        );
    }

    #[tokio::test]
    async fn stop_before_connect_prevents_connecting() {
        let ticker =
            KiteTicker::new(KiteTickerConfig::new("ws://127.0.0.1:1"), &credentials()).unwrap();

        ticker.stop().await.unwrap();
        assert!(ticker.is_stopped());
        assert_eq!(ticker.state(), ConnectionState::Closed);

        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(matches!(
            ticker.connect(tx).await,
            Err(KiteTickerError::Stopped)
        ));
        assert_eq!(
            ticker
                .set_mode(StreamMode::Full, &[InstrumentToken::new(1)])
                .await,
            Err(TickerError::Stopped)
        );
    }

    #[test]
    fn http_403_maps_to_invalid_credentials() {
        let response = tokio_tungstenite::tungstenite::http::Response::builder()
            .status(403)
            .body(None)
            .unwrap();
        let err = KiteTickerError::from_handshake(WsError::Http(response.into()));
        assert!(matches!(err, KiteTickerError::InvalidCredentials));
    }
}
