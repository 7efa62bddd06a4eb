//! Ticker Lifecycle Integration Tests
//!
//! Runs the ticker client, stream session and dispatcher against a local
//! WebSocket server standing in for the Kite streaming endpoint.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

use kite_tick_streamer::application::ports::{ProcessError, TickProcessorPort, TickerControlPort};
use kite_tick_streamer::{
    ConnectionState, CredentialPair, KiteTicker, KiteTickerConfig, KiteTickerError, StreamEvent,
    StreamSession, Subscription, TickBatch, TickDispatcher, WATCHLIST, WATCHLIST_LEN,
};

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct RecordingProcessor {
    payloads: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl TickProcessorPort for RecordingProcessor {
    async fn process(&self, batch: TickBatch) -> Result<(), ProcessError> {
        self.payloads.lock().push(batch.into_payload());
        Ok(())
    }
}

/// What the fake server observed from the client.
struct Observed {
    query: String,
    kite_version: Option<String>,
    text_frames: Vec<Value>,
}

fn credentials() -> CredentialPair {
    CredentialPair::new("test-token", "test-key").unwrap()
}

fn install_crypto() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Accept one client, wait for its two control frames, push `ticks`, then
/// close the connection with code 1000.
async fn spawn_kite_server(
    ticks: Vec<Vec<u8>>,
) -> (String, tokio::task::JoinHandle<Observed>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();

        let mut query = String::new();
        let mut kite_version = None;
        let callback = |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            query = req.uri().query().unwrap_or_default().to_string();
            kite_version = req
                .headers()
                .get("X-Kite-Version")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            Ok(resp)
        };
        let mut ws = accept_hdr_async(stream, callback).await.unwrap();

        let mut text_frames = Vec::new();
        while text_frames.len() < 2 {
            if let Message::Text(text) = ws.next().await.unwrap().unwrap() {
                text_frames.push(serde_json::from_str(&text).unwrap());
            }
        }

        for (i, payload) in ticks.into_iter().enumerate() {
            ws.send(Message::Binary(payload.into())).await.unwrap();
            if i == 0 {
                // heartbeat between batches
                ws.send(Message::Binary(vec![0u8].into())).await.unwrap();
                ws.send(Message::Text(r#"{"type":"message","data":"hello"}"#.into()))
                    .await
                    .unwrap();
            }
        }

        ws.send(Message::Close(Some(CloseFrame {
            code: CloseCode::Normal,
            reason: "bye".into(),
        })))
        .await
        .unwrap();

        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Text(text) = msg {
                text_frames.push(serde_json::from_str(&text).unwrap());
            }
        }

        Observed {
            query,
            kite_version,
            text_frames,
        }
    });

    (format!("ws://{addr}"), handle)
}

async fn wait_for_completed(dispatcher_stats: &kite_tick_streamer::DispatchStats, n: u64) {
    timeout(TEST_TIMEOUT, async {
        while dispatcher_stats.completed() + dispatcher_stats.failed() < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("processing tasks did not finish");
}

#[tokio::test]
async fn full_session_subscribes_dispatches_and_stops_on_close() {
    install_crypto();
    let ticks = vec![vec![1, 2, 3, 4], vec![5, 6, 7]];
    let (url, server) = spawn_kite_server(ticks.clone()).await;

    let ticker = Arc::new(KiteTicker::new(KiteTickerConfig::new(url), &credentials()).unwrap());
    let processor = Arc::new(RecordingProcessor::default());
    let dispatcher = TickDispatcher::new(processor.clone());
    let stats = dispatcher.stats();
    let session = StreamSession::new(ticker.clone(), dispatcher, Subscription::full_watchlist());

    let (tx, rx) = mpsc::unbounded_channel();
    let session_handle = tokio::spawn(session.run(rx));

    timeout(TEST_TIMEOUT, ticker.connect(tx))
        .await
        .unwrap()
        .unwrap();
    let summary = timeout(TEST_TIMEOUT, session_handle)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(summary.connects, 1);
    assert_eq!(summary.batches, 2);
    let close = summary.close.unwrap();
    assert_eq!(close.code, Some(1000));
    assert_eq!(close.reason, "bye");

    // Close triggers stop, which rules out any reconnect
    assert!(ticker.is_stopped());
    assert_eq!(ticker.state(), ConnectionState::Closed);
    let (tx, _rx) = mpsc::unbounded_channel();
    assert!(matches!(
        ticker.connect(tx).await,
        Err(KiteTickerError::Stopped)
    ));

    wait_for_completed(&stats, 2).await;
    let recorded: HashSet<Vec<u8>> = processor.payloads.lock().iter().cloned().collect();
    let expected: HashSet<Vec<u8>> = ticks.into_iter().collect();
    assert_eq!(recorded, expected);
    assert_eq!(stats.dispatched(), 2);

    let observed = timeout(TEST_TIMEOUT, server).await.unwrap().unwrap();
    assert!(observed.query.contains("api_key=test-key"));
    assert!(observed.query.contains("access_token=test-token"));
    assert_eq!(observed.kite_version.as_deref(), Some("3"));

    assert_eq!(observed.text_frames.len(), 2, "exactly one subscribe and one mode");
    let subscribe = &observed.text_frames[0];
    assert_eq!(subscribe["a"], "subscribe");
    let subscribed = subscribe["v"].as_array().unwrap();
    assert_eq!(subscribed.len(), WATCHLIST_LEN);

    let mode = &observed.text_frames[1];
    assert_eq!(mode["a"], "mode");
    assert_eq!(mode["v"][0], "full");
    let moded = mode["v"][1].as_array().unwrap();
    assert_eq!(moded, subscribed);

    let expected_tokens: Vec<u64> = WATCHLIST.iter().map(|&t| u64::from(t)).collect();
    let sent_tokens: Vec<u64> = subscribed.iter().map(|v| v.as_u64().unwrap()).collect();
    assert_eq!(sent_tokens, expected_tokens);
}

#[tokio::test]
async fn forbidden_handshake_is_invalid_credentials() {
    install_crypto();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let callback = |_req: &Request, _resp: Response| -> Result<Response, ErrorResponse> {
            let mut rejection = ErrorResponse::new(Some("invalid access token".to_string()));
            *rejection.status_mut() = StatusCode::FORBIDDEN;
            Err(rejection)
        };
        let _ = accept_hdr_async(stream, callback).await;
    });

    let ticker =
        KiteTicker::new(KiteTickerConfig::new(format!("ws://{addr}")), &credentials()).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let result = timeout(TEST_TIMEOUT, ticker.connect(tx)).await.unwrap();

    assert!(matches!(result, Err(KiteTickerError::InvalidCredentials)));
    assert_eq!(ticker.state(), ConnectionState::Closed);
    assert!(rx.recv().await.is_none(), "no events for a rejected handshake");
}

#[tokio::test]
async fn stop_while_connected_sends_close_frame() {
    install_crypto();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let mut saw_close = false;
        while let Some(Ok(msg)) = ws.next().await {
            if matches!(msg, Message::Close(_)) {
                saw_close = true;
            }
        }
        saw_close
    });

    let ticker = Arc::new(
        KiteTicker::new(KiteTickerConfig::new(format!("ws://{addr}")), &credentials()).unwrap(),
    );
    let (tx, mut rx) = mpsc::unbounded_channel();

    let connecting = {
        let ticker = Arc::clone(&ticker);
        tokio::spawn(async move { ticker.connect(tx).await })
    };

    let first = timeout(TEST_TIMEOUT, rx.recv()).await.unwrap().unwrap();
    assert!(matches!(first, StreamEvent::Connected));
    assert_eq!(ticker.state(), ConnectionState::Connected);

    ticker.stop().await.unwrap();

    timeout(TEST_TIMEOUT, connecting)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(ticker.state(), ConnectionState::Closed);
    assert!(timeout(TEST_TIMEOUT, server).await.unwrap().unwrap());
}
