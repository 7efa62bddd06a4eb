//! Stream Session
//!
//! Consumes the ticker's event channel and reacts to each event:
//!
//! - `Connected`: one subscribe request and one mode request for the
//!   configured subscription
//! - `Ticks`: hand the batch to the dispatcher and return at once
//! - `Closed`: stop the ticker so no reconnection takes place, then end

use std::sync::Arc;

use tokio::sync::mpsc;

use super::dispatch::TickDispatcher;
use crate::application::ports::TickerControlPort;
use crate::domain::instruments::Subscription;
use crate::domain::streaming::{StreamEvent, TickBatch};

/// Close details reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseInfo {
    /// Close code, if the server sent one.
    pub code: Option<u16>,
    /// Close reason.
    pub reason: String,
}

/// What happened during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Connected events handled.
    pub connects: u32,
    /// Tick batches dispatched.
    pub batches: u64,
    /// Close event, if the session ended on one.
    pub close: Option<CloseInfo>,
}

/// Reacts to ticker events for one connection.
pub struct StreamSession {
    control: Arc<dyn TickerControlPort>,
    dispatcher: TickDispatcher,
    subscription: Subscription,
}

impl StreamSession {
    /// Create a session.
    #[must_use]
    pub fn new(
        control: Arc<dyn TickerControlPort>,
        dispatcher: TickDispatcher,
        subscription: Subscription,
    ) -> Self {
        Self {
            control,
            dispatcher,
            subscription,
        }
    }

    /// Process events until a close event arrives or the channel ends.
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<StreamEvent>) -> SessionSummary {
        let mut summary = SessionSummary::default();

        while let Some(event) = events.recv().await {
            tracing::trace!(event = event.kind(), "Stream event");

            match event {
                StreamEvent::Connected => {
                    summary.connects += 1;
                    self.on_connect().await;
                }
                StreamEvent::Ticks(batch) => {
                    summary.batches += 1;
                    self.on_ticks(batch);
                }
                StreamEvent::Closed { code, reason } => {
                    self.on_close(code, &reason).await;
                    summary.close = Some(CloseInfo { code, reason });
                    break;
                }
            }
        }

        tracing::info!(
            connects = summary.connects,
            batches = summary.batches,
            "Stream session ended"
        );
        summary
    }

    /// Subscribe the configured instruments and set their mode.
    pub async fn on_connect(&self) {
        let tokens = self.subscription.instruments.tokens();
        let mode = self.subscription.mode;

        tracing::info!(
            instruments = tokens.len(),
            mode = mode.as_str(),
            "Ticker connected, subscribing"
        );

        if let Err(e) = self.control.subscribe(tokens).await {
            tracing::error!(error = %e, "Subscribe request failed");
            return;
        }

        if let Err(e) = self.control.set_mode(mode, tokens).await {
            tracing::error!(error = %e, "Mode request failed");
        }
    }

    /// Dispatch a tick batch without waiting for it to be processed.
    pub fn on_ticks(&self, batch: TickBatch) {
        self.dispatcher.dispatch(batch);
    }

    /// Stop the ticker after the server closed the connection.
    pub async fn on_close(&self, code: Option<u16>, reason: &str) {
        tracing::warn!(?code, reason, "Ticker connection closed, stopping");

        if let Err(e) = self.control.stop().await {
            tracing::error!(error = %e, "Failed to stop ticker");
        }
    }
}
