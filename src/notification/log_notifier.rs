//! A notifier that logs the alerts it receives instead of delivering them.
//!
//! Used for dry runs and to validate receiver configs end to end without
//! touching any external endpoint.

use crate::core::{Alert, Notifier, NotifyContext, NotifyError, NotifyOutcome};
use crate::notification::builder::ChannelBuilder;
use crate::receiver::{ChannelConfig, ChannelKind, ConfigError};
use crate::template::Template;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct LogNotifier {
    kind: ChannelKind,
    /// Extra rendering hint shown with every alert (e.g. a title link template).
    detail: Option<String>,
}

impl LogNotifier {
    pub fn new(kind: ChannelKind) -> Self {
        Self { kind, detail: None }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    #[instrument(skip_all, fields(channel = %self.kind, group_key = %ctx.group_key))]
    async fn notify(&self, ctx: &NotifyContext, alerts: &[Alert]) -> NotifyOutcome {
        if ctx.is_cancelled() {
            return NotifyOutcome::retryable(NotifyError::Cancelled);
        }
        for alert in alerts {
            info!(
                alert = alert.name(),
                labels = ?alert.labels,
                detail = self.detail.as_deref().unwrap_or(""),
                "Dry-run notification"
            );
        }
        NotifyOutcome::delivered()
    }
}

/// Validates the instance config and yields a [`LogNotifier`] for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifierBuilder;

impl ChannelBuilder for LogNotifierBuilder {
    fn build(
        &self,
        config: &ChannelConfig,
        _template: &Arc<Template>,
    ) -> Result<Arc<dyn Notifier>, ConfigError> {
        config.validate()?;
        Ok(Arc::new(LogNotifier::new(config.kind())))
    }
}
