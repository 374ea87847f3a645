//! Wiring of the assembler for every configured receiver.

use crate::{
    config::Config,
    core::{Alert, NotifyContext, NotifyOutcome},
    notification::{
        AssembleError, Assembler, ChannelBuilder, ChannelRegistry, Integration, IntegrationId,
        LogNotifierBuilder, MsTeamsV2Builder,
    },
    receiver::{ChannelKind, ReceiverConfig},
    template::Template,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Creates the assembler used by the binary: dry-run notifiers for every
/// channel type, with the configured types routed to their dedicated builder.
pub fn build_assembler(config: &Config) -> Assembler {
    let overrides = config.overrides.iter().map(|kind| {
        let builder: Arc<dyn ChannelBuilder> = match kind {
            ChannelKind::MsTeamsV2 => Arc::new(MsTeamsV2Builder::default()),
            _ => Arc::new(LogNotifierBuilder),
        };
        (*kind, builder)
    });
    Assembler::new(Arc::new(ChannelRegistry::dry_run()), overrides)
}

/// The outcome of assembling one receiver.
#[derive(Debug)]
pub struct ReceiverReport {
    pub receiver: String,
    pub result: Result<Vec<Integration>, AssembleError>,
}

/// A serialisable summary of a [`ReceiverReport`].
#[derive(Debug, Serialize, PartialEq)]
pub struct ReceiverSummary {
    pub receiver: String,
    pub integrations: Vec<String>,
    pub errors: Vec<String>,
}

impl ReceiverReport {
    pub fn summary(&self) -> ReceiverSummary {
        let (integrations, errors) = match &self.result {
            Ok(integrations) => (
                integrations.iter().map(|i| i.id().to_string()).collect(),
                Vec::new(),
            ),
            Err(err) if err.failures().is_empty() => (Vec::new(), vec![err.to_string()]),
            Err(err) => (
                Vec::new(),
                err.failures().iter().map(|f| f.to_string()).collect(),
            ),
        };
        ReceiverSummary {
            receiver: self.receiver.clone(),
            integrations,
            errors,
        }
    }
}

/// Assembles every receiver. A failing receiver does not prevent the others
/// from being assembled.
pub fn setup_receivers(
    assembler: &Assembler,
    receivers: &[ReceiverConfig],
    template: &Arc<Template>,
) -> Vec<ReceiverReport> {
    receivers
        .iter()
        .map(|receiver| {
            let result = assembler.assemble(receiver, template);
            match &result {
                Ok(integrations) => info!(
                    receiver = %receiver.name,
                    count = integrations.len(),
                    "Receiver integrations ready"
                ),
                Err(e) => error!(receiver = %receiver.name, error = %e, "Receiver failed to activate"),
            }
            ReceiverReport {
                receiver: receiver.name.clone(),
                result,
            }
        })
        .collect()
}

/// Sends each integration the subset of `alerts` it accepts, concurrently.
/// Integrations that accept none are skipped.
pub async fn dispatch(
    integrations: &[Integration],
    ctx: &NotifyContext,
    alerts: &[Alert],
    now: DateTime<Utc>,
) -> Vec<(IntegrationId, NotifyOutcome)> {
    let calls = integrations.iter().filter_map(|integration| {
        let accepted: Vec<Alert> = alerts
            .iter()
            .filter(|alert| integration.accepts(alert, now))
            .cloned()
            .collect();
        if accepted.is_empty() {
            return None;
        }
        Some(async move {
            let outcome = integration.notify(ctx, &accepted).await;
            (integration.id().clone(), outcome)
        })
    });
    join_all(calls).await
}
