//! Tick Dispatch Integration Tests
//!
//! Feeds stream events through `StreamSession` and checks that every tick
//! batch reaches the processor exactly once.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use proptest::prelude::*;
use tokio::sync::mpsc;
use tokio::time::timeout;

use kite_tick_streamer::application::ports::{
    ProcessError, TickProcessorPort, TickerControlPort, TickerError,
};
use kite_tick_streamer::{
    DispatchStats, InstrumentList, InstrumentToken, StreamEvent, StreamMode, StreamSession,
    Subscription, TickBatch, TickDispatcher,
};

/// Ticker control that only counts calls.
#[derive(Default)]
struct CountingControl {
    subscribes: AtomicUsize,
    modes: AtomicUsize,
    stops: AtomicUsize,
}

#[async_trait]
impl TickerControlPort for CountingControl {
    async fn subscribe(&self, _tokens: &[InstrumentToken]) -> Result<(), TickerError> {
        self.subscribes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_mode(
        &self,
        _mode: StreamMode,
        _tokens: &[InstrumentToken],
    ) -> Result<(), TickerError> {
        self.modes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), TickerError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Records every payload; fails batches whose first byte is `0xFF`.
#[derive(Default)]
struct RecordingProcessor {
    calls: AtomicUsize,
    payloads: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl TickProcessorPort for RecordingProcessor {
    async fn process(&self, batch: TickBatch) -> Result<(), ProcessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let payload = batch.into_payload();
        let reject = payload.first() == Some(&0xFF);
        self.payloads.lock().push(payload);
        if reject {
            return Err(ProcessError::Rejected("poisoned batch".to_string()));
        }
        Ok(())
    }
}

async fn wait_until_done(stats: &DispatchStats, n: u64) {
    timeout(Duration::from_secs(5), async {
        while stats.completed() + stats.failed() < n {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("processing tasks did not finish");
}

/// Run one session over `payloads` and return the processor and stats.
async fn run_session(
    payloads: Vec<Vec<u8>>,
) -> (Arc<CountingControl>, Arc<RecordingProcessor>, Arc<DispatchStats>) {
    let control = Arc::new(CountingControl::default());
    let processor = Arc::new(RecordingProcessor::default());
    let dispatcher = TickDispatcher::new(processor.clone());
    let stats = dispatcher.stats();
    let subscription = Subscription::new(InstrumentList::new([256_265, 260_105]), StreamMode::Full);
    let session = StreamSession::new(control.clone(), dispatcher, subscription);

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(StreamEvent::Connected).unwrap();
    for payload in &payloads {
        tx.send(StreamEvent::Ticks(TickBatch::new(payload.clone())))
            .unwrap();
    }
    tx.send(StreamEvent::Closed {
        code: Some(1000),
        reason: "done".to_string(),
    })
    .unwrap();

    let summary = session.run(rx).await;
    assert_eq!(summary.batches, payloads.len() as u64);

    wait_until_done(&stats, payloads.len() as u64).await;
    (control, processor, stats)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_batch_is_processed_exactly_once(
        payloads in prop::collection::vec(prop::collection::vec(0u8..0xFF, 2..64), 0..40)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (control, processor, stats) = rt.block_on(run_session(payloads.clone()));

        prop_assert_eq!(processor.calls.load(Ordering::SeqCst), payloads.len());
        prop_assert_eq!(stats.dispatched(), payloads.len() as u64);
        prop_assert_eq!(stats.in_flight(), 0);

        let mut seen = processor.payloads.lock().clone();
        let mut expected = payloads;
        seen.sort();
        expected.sort();
        prop_assert_eq!(seen, expected);

        prop_assert_eq!(control.subscribes.load(Ordering::SeqCst), 1);
        prop_assert_eq!(control.modes.load(Ordering::SeqCst), 1);
        prop_assert_eq!(control.stops.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn failures_are_counted_and_do_not_stop_dispatch() {
    let payloads = vec![
        vec![0x01, 0x02],
        vec![0xFF, 0x00],
        vec![0x03, 0x04],
        vec![0xFF, 0x01],
        vec![0x05, 0x06],
    ];

    let (control, processor, stats) = run_session(payloads).await;

    assert_eq!(processor.calls.load(Ordering::SeqCst), 5);
    assert_eq!(stats.dispatched(), 5);
    assert_eq!(stats.completed(), 3);
    assert_eq!(stats.failed(), 2);
    assert_eq!(control.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn events_after_close_are_ignored() {
    let control = Arc::new(CountingControl::default());
    let processor = Arc::new(RecordingProcessor::default());
    let dispatcher = TickDispatcher::new(processor.clone());
    let stats = dispatcher.stats();
    let session = StreamSession::new(control.clone(), dispatcher, Subscription::full_watchlist());

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(StreamEvent::Closed {
        code: None,
        reason: "stream ended".to_string(),
    })
    .unwrap();
    tx.send(StreamEvent::Connected).unwrap();
    tx.send(StreamEvent::Ticks(TickBatch::new(vec![1, 2]))).unwrap();

    let summary = session.run(rx).await;

    assert_eq!(summary.connects, 0);
    assert_eq!(summary.batches, 0);
    assert_eq!(control.subscribes.load(Ordering::SeqCst), 0);
    assert_eq!(control.stops.load(Ordering::SeqCst), 1);
    assert_eq!(stats.dispatched(), 0);
}
