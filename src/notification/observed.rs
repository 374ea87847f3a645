//! A notifier decorator that records every dispatch call.
//!
//! Two records are emitted per call: `integration notify called` with the
//! `integration` and `num_alerts` fields before delegating, and
//! `integration notify result` with `integration`, `retry` and `error` after.
//! The inner outcome is returned untouched.

use crate::core::{Alert, Notifier, NotifyContext, NotifyOutcome};
use crate::notification::identity::IntegrationId;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct ObservedNotifier {
    inner: Arc<dyn Notifier>,
    label: String,
}

impl ObservedNotifier {
    pub fn new(inner: Arc<dyn Notifier>, id: IntegrationId) -> Self {
        Self {
            inner,
            label: id.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for ObservedNotifier {
    async fn notify(&self, ctx: &NotifyContext, alerts: &[Alert]) -> NotifyOutcome {
        info!(
            integration = %self.label,
            num_alerts = alerts.len(),
            "integration notify called"
        );

        let start = Instant::now();
        let outcome = self.inner.notify(ctx, alerts).await;

        let error = match &outcome.error {
            Some(err) => err.to_string(),
            None => "none".to_string(),
        };
        info!(
            integration = %self.label,
            retry = outcome.retry,
            error = %error,
            "integration notify result"
        );

        let result = match (&outcome.error, outcome.retry) {
            (None, _) => "success",
            (Some(_), true) => "retryable",
            (Some(_), false) => "failed",
        };
        metrics::counter!(
            "integration_notifications_total",
            "integration" => self.label.clone(),
            "outcome" => result
        )
        .increment(1);
        metrics::histogram!(
            "integration_notify_duration_seconds",
            "integration" => self.label.clone()
        )
        .record(start.elapsed().as_secs_f64());

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NotifyError;
    use crate::receiver::ChannelKind;
    use chrono::{TimeZone, Utc};
    use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
    use metrics_util::registry::{AtomicStorage, Registry};
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    /// Returns a fixed outcome and records every batch it was given.
    struct ScriptedNotifier {
        outcome: NotifyOutcome,
        seen: Mutex<Vec<Vec<Alert>>>,
    }

    impl ScriptedNotifier {
        fn new(outcome: NotifyOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Notifier for ScriptedNotifier {
        async fn notify(&self, _ctx: &NotifyContext, alerts: &[Alert]) -> NotifyOutcome {
            self.seen.lock().unwrap().push(alerts.to_vec());
            self.outcome.clone()
        }
    }

    /// Keeps every registered metric in an in-memory registry.
    struct CapturingRecorder {
        registry: Arc<Registry<Key, AtomicStorage>>,
    }

    impl CapturingRecorder {
        fn new() -> Self {
            Self {
                registry: Arc::new(Registry::new(AtomicStorage)),
            }
        }

        fn counter(&self, name: &str, integration: &str, outcome: &str) -> u64 {
            self.registry
                .get_counter_handles()
                .into_iter()
                .filter(|(key, _)| {
                    key.name() == name
                        && has_label(key, "integration", integration)
                        && has_label(key, "outcome", outcome)
                })
                .map(|(_, counter)| counter.load(Ordering::Relaxed))
                .sum()
        }

        fn histogram_samples(&self, name: &str, integration: &str) -> usize {
            self.registry
                .get_histogram_handles()
                .into_iter()
                .filter(|(key, _)| key.name() == name && has_label(key, "integration", integration))
                .map(|(_, bucket)| bucket.data().len())
                .sum()
        }
    }

    fn has_label(key: &Key, name: &str, value: &str) -> bool {
        key.labels().any(|l| l.key() == name && l.value() == value)
    }

    impl Recorder for CapturingRecorder {
        fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

        fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

        fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

        fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
            self.registry.get_or_create_counter(key, |c| c.clone()).into()
        }

        fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
            self.registry.get_or_create_gauge(key, |g| g.clone()).into()
        }

        fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
            self.registry.get_or_create_histogram(key, |h| h.clone()).into()
        }
    }

    fn alerts() -> Vec<Alert> {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        vec![Alert::firing("DiskFull", start), Alert::firing("HighLoad", start)]
    }

    fn observed(inner: Arc<ScriptedNotifier>) -> ObservedNotifier {
        ObservedNotifier::new(inner, IntegrationId::new("r2", ChannelKind::Email, 0))
    }

    #[tokio::test]
    async fn test_forwards_every_outcome_verbatim() {
        let cases = vec![
            NotifyOutcome::delivered(),
            NotifyOutcome {
                retry: true,
                error: None,
            },
            NotifyOutcome::retryable(NotifyError::Transport("connection reset".into())),
            NotifyOutcome::failed(NotifyError::Rejected {
                status: 400,
                body: "bad payload".into(),
            }),
        ];

        for expected in cases {
            let inner = ScriptedNotifier::new(expected.clone());
            let outcome = observed(inner.clone())
                .notify(&NotifyContext::default(), &alerts())
                .await;
            assert_eq!(outcome, expected);
        }
    }

    #[test]
    fn test_records_outcome_metrics() {
        let recorder = CapturingRecorder::new();
        let cases = vec![
            NotifyOutcome::delivered(),
            NotifyOutcome::retryable(NotifyError::Transport("connection reset".into())),
            NotifyOutcome::failed(NotifyError::Rejected {
                status: 400,
                body: "bad payload".into(),
            }),
        ];

        metrics::with_local_recorder(&recorder, || {
            for outcome in cases {
                let notifier = observed(ScriptedNotifier::new(outcome));
                futures::executor::block_on(notifier.notify(&NotifyContext::default(), &alerts()));
            }
        });

        for outcome in ["success", "retryable", "failed"] {
            assert_eq!(
                recorder.counter("integration_notifications_total", "r2/email[0]", outcome),
                1,
                "outcome={outcome}"
            );
        }
        assert_eq!(
            recorder.histogram_samples("integration_notify_duration_seconds", "r2/email[0]"),
            3
        );
    }

    #[tokio::test]
    async fn test_batch_reaches_inner_unmodified() {
        let batch = alerts();
        let before = batch.clone();
        let inner = ScriptedNotifier::new(NotifyOutcome::delivered());
        let notifier = observed(inner.clone());

        notifier.notify(&NotifyContext::default(), &batch).await;
        notifier.notify(&NotifyContext::default(), &batch).await;

        assert_eq!(batch, before);
        let seen = inner.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|b| *b == before));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_logs_before_and_after_dispatch() {
        let inner = ScriptedNotifier::new(NotifyOutcome::retryable(NotifyError::Transport(
            "connection reset".into(),
        )));
        observed(inner)
            .notify(&NotifyContext::default(), &alerts())
            .await;

        assert!(logs_contain("integration notify called"));
        assert!(logs_contain("integration=r2/email[0]"));
        assert!(logs_contain("num_alerts=2"));
        assert!(logs_contain("integration notify result"));
        assert!(logs_contain("retry=true"));
        assert!(logs_contain("error=transport error: connection reset"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_logs_success_as_none() {
        let inner = ScriptedNotifier::new(NotifyOutcome::delivered());
        observed(inner)
            .notify(&NotifyContext::default(), &[])
            .await;

        assert!(logs_contain("num_alerts=0"));
        assert!(logs_contain("retry=false"));
        assert!(logs_contain("error=none"));
    }
}
