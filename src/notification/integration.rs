//! The executable handle for one configured channel instance.

use crate::core::{Alert, AlertStatus, Notifier, NotifyContext, NotifyOutcome, ResolvedSender};
use crate::notification::identity::IntegrationId;
use crate::receiver::ChannelKind;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// A notifier bound to its identity. Cheap to clone and safe to invoke from
/// many tasks at once.
#[derive(Clone)]
pub struct Integration {
    notifier: Arc<dyn Notifier>,
    resolved_sender: Arc<dyn ResolvedSender>,
    id: IntegrationId,
}

impl Integration {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        resolved_sender: Arc<dyn ResolvedSender>,
        id: IntegrationId,
    ) -> Self {
        Self {
            notifier,
            resolved_sender,
            id,
        }
    }

    pub fn id(&self) -> &IntegrationId {
        &self.id
    }

    /// The channel type name, e.g. `email`.
    pub fn name(&self) -> &'static str {
        self.id.kind.as_str()
    }

    pub fn kind(&self) -> ChannelKind {
        self.id.kind
    }

    pub fn index(&self) -> usize {
        self.id.index
    }

    pub fn receiver_name(&self) -> &str {
        &self.id.receiver
    }

    pub fn send_resolved(&self) -> bool {
        self.resolved_sender.send_resolved()
    }

    /// Firing alerts are always accepted; resolved ones only when this
    /// instance sends resolved notifications.
    pub fn accepts(&self, alert: &Alert, now: DateTime<Utc>) -> bool {
        match alert.status_at(now) {
            AlertStatus::Firing => true,
            AlertStatus::Resolved => self.send_resolved(),
        }
    }

    pub async fn notify(&self, ctx: &NotifyContext, alerts: &[Alert]) -> NotifyOutcome {
        self.notifier.notify(ctx, alerts).await
    }
}

impl fmt::Debug for Integration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Integration")
            .field("id", &self.id.to_string())
            .field("send_resolved", &self.send_resolved())
            .finish()
    }
}
