//! Notifiers that record what they were asked to deliver.

use alertdispatch::core::{Alert, Notifier, NotifyContext, NotifyOutcome};
use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tokio::sync::Barrier;

/// Returns a fixed outcome and keeps every batch it received.
#[derive(Debug)]
pub struct RecordingNotifier {
    pub outcome: NotifyOutcome,
    pub batches: Mutex<Vec<Vec<Alert>>>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    gate: Option<Barrier>,
}

impl RecordingNotifier {
    pub fn new(outcome: NotifyOutcome) -> Arc<Self> {
        Arc::new(Self::build(outcome, None))
    }

    /// Holds every call until `parties` calls are in flight at once.
    pub fn gated(outcome: NotifyOutcome, parties: usize) -> Arc<Self> {
        Arc::new(Self::build(outcome, Some(Barrier::new(parties))))
    }

    fn build(outcome: NotifyOutcome, gate: Option<Barrier>) -> Self {
        Self {
            outcome,
            batches: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            gate,
        }
    }

    pub fn calls(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, _ctx: &NotifyContext, alerts: &[Alert]) -> NotifyOutcome {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        match &self.gate {
            Some(gate) => {
                gate.wait().await;
            }
            None => tokio::task::yield_now().await,
        }
        self.batches.lock().unwrap().push(alerts.to_vec());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
