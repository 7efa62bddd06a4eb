//! Kite Tick Streamer Binary
//!
//! Acquires credentials, connects to the Kite ticker, subscribes the
//! built-in watchlist in full mode and logs every tick batch to disk until
//! the server closes the connection or the process receives SIGINT/SIGTERM.
//! Batches still being written are flushed before exit.
//!
//! # Usage
//!
//! ```bash
//! ENDPOINT=https://tokens.example/kite cargo run --bin kite-tick-streamer
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `ENDPOINT`: Token-issuance URL
//!
//! ## Optional
//! - `KITE_TOKEN_STORE`: Credential cache path (default: `__TOKEN_STORE.txt`)
//! - `KITE_TICKER_URL`: Ticker endpoint (default: `wss://ws.kite.trade`)
//! - `TICK_LOG_PATH`: Tick log path (default: `ticks.bin`)
//! - `TOKEN_REQUEST_TIMEOUT_SECS`: Token request timeout (default: 30)
//! - `STREAMER_METRICS_PORT`: Prometheus metrics port (default: 0, disabled)
//! - `OTEL_ENABLED`: Enable OpenTelemetry export (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4317>)
//! - `OTEL_SERVICE_NAME`: Service name (default: kite-tick-streamer)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use anyhow::Context;
use kite_tick_streamer::application::ports::TickerControlPort;
use kite_tick_streamer::infrastructure::metrics;
use kite_tick_streamer::infrastructure::telemetry;
use kite_tick_streamer::{
    CredentialService, FileCredentialStore, FileTickWriter, HttpTokenIssuer, KiteTicker,
    KiteTickerConfig, StreamSession, StreamerConfig, Subscription, TickDispatcher,
};
use tokio::signal;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Err means a provider is already installed
    let _ = rustls::crypto::ring::default_provider().install_default();

    load_dotenv();

    let config = StreamerConfig::from_env().context("invalid configuration")?;

    let _telemetry_guard = telemetry::init();

    tracing::info!("Starting Kite tick streamer");
    log_config(&config);

    if let Some(addr) =
        metrics::init_metrics(config.metrics_port).context("failed to start metrics exporter")?
    {
        tracing::info!(%addr, "Prometheus metrics listening");
    }

    // Credentials: cached pair, or one call to the token endpoint
    let store = Arc::new(FileCredentialStore::new(&config.token_store_path));
    let issuer = Arc::new(
        HttpTokenIssuer::new(&config.token_endpoint).context("failed to build token client")?,
    );
    let acquired = CredentialService::new(store, issuer)
        .acquire()
        .await
        .context("failed to acquire Kite credentials")?;
    metrics::record_credentials_acquired(acquired.source.as_str());
    tracing::info!(
        source = acquired.source.as_str(),
        api_key = acquired.pair.api_key(),
        "Credentials ready"
    );

    let ticker = Arc::new(
        KiteTicker::new(KiteTickerConfig::from(&config.ticker), &acquired.pair)
            .context("failed to build ticker client")?,
    );

    let writer = FileTickWriter::open(&config.tick_log_path)
        .await
        .context("failed to open tick log")?;
    let dispatcher = TickDispatcher::new(Arc::new(writer));
    let stats = dispatcher.stats();

    let session = StreamSession::new(
        ticker.clone(),
        dispatcher.clone(),
        Subscription::full_watchlist(),
    );

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let session_handle = tokio::spawn(session.run(events_rx));

    let connect = ticker.connect(events_tx);
    tokio::pin!(connect);

    let connect_result = tokio::select! {
        result = &mut connect => result,
        () = shutdown_signal() => {
            if let Err(e) = ticker.stop().await {
                tracing::error!(error = %e, "Failed to stop ticker");
            }
            // The connection loop sends the close frame and returns
            connect.await
        }
    };

    match session_handle.await {
        Ok(summary) => tracing::debug!(close = ?summary.close, "Session finished"),
        Err(e) => tracing::error!(error = %e, "Stream session task failed"),
    }

    dispatcher.drain().await;

    tracing::info!(
        dispatched = stats.dispatched(),
        completed = stats.completed(),
        failed = stats.failed(),
        in_flight = stats.in_flight(),
        "Tick processing totals"
    );

    connect_result.context("ticker connection failed")?;

    tracing::info!("Kite tick streamer stopped");
    Ok(())
}

/// Load the nearest .env file from the current or an ancestor directory.
fn load_dotenv() {
    // A missing .env is not an error
    let _ = dotenvy::dotenv();
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, stopping ticker");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, stopping ticker");
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &StreamerConfig) {
    tracing::info!(
        ticker_url = %config.ticker.url,
        token_store = %config.token_store_path.display(),
        tick_log = %config.tick_log_path.display(),
        metrics_port = config.metrics_port,
        "Configuration loaded"
    );
    tracing::debug!(
        token_endpoint = %config.token_endpoint.url,
        timeout_secs = config.token_endpoint.timeout.as_secs(),
        "Token endpoint"
    );
}
