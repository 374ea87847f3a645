//! Channel builders: the pluggable functions that turn one channel config
//! into a raw notifier, and the default builder that applies them to a whole
//! receiver.

use crate::core::{Notifier, ResolvedSender};
use crate::notification::error::{BuildError, MultiError};
use crate::notification::identity::IntegrationId;
use crate::notification::log_notifier::LogNotifierBuilder;
use crate::receiver::{ChannelConfig, ChannelKind, ConfigError, ReceiverConfig};
use crate::template::Template;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info_span, warn};

/// Builds the raw notifier for one configured channel instance.
///
/// Called inside a span carrying the instance's identity, so anything the
/// builder (or the notifier's constructor) logs is attributed to it.
pub trait ChannelBuilder: Send + Sync {
    fn build(
        &self,
        config: &ChannelConfig,
        template: &Arc<Template>,
    ) -> Result<Arc<dyn Notifier>, ConfigError>;
}

impl<F> ChannelBuilder for F
where
    F: Fn(&ChannelConfig, &Arc<Template>) -> Result<Arc<dyn Notifier>, ConfigError> + Send + Sync,
{
    fn build(
        &self,
        config: &ChannelConfig,
        template: &Arc<Template>,
    ) -> Result<Arc<dyn Notifier>, ConfigError> {
        self(config, template)
    }
}

/// A raw notifier produced by a [`DefaultBuilder`], not yet decorated.
pub struct BuiltNotifier {
    pub notifier: Arc<dyn Notifier>,
    pub resolved_sender: Arc<dyn ResolvedSender>,
    pub kind: ChannelKind,
    pub index: usize,
}

/// Builds every channel instance of a receiver except the excluded kinds.
///
/// Implementations are best-effort internally: they try every instance and
/// report all failures together.
pub trait DefaultBuilder: Send + Sync {
    fn build(
        &self,
        receiver: &ReceiverConfig,
        template: &Arc<Template>,
        excluded: &[ChannelKind],
    ) -> Result<Vec<BuiltNotifier>, MultiError>;
}

/// The default builder: one [`ChannelBuilder`] per channel type.
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    builders: BTreeMap<ChannelKind, Arc<dyn ChannelBuilder>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that builds a log-only notifier for every channel type.
    pub fn dry_run() -> Self {
        ChannelKind::ALL
            .into_iter()
            .fold(Self::new(), |registry, kind| {
                registry.with_builder(kind, LogNotifierBuilder)
            })
    }

    pub fn with_builder(mut self, kind: ChannelKind, builder: impl ChannelBuilder + 'static) -> Self {
        self.register(kind, Arc::new(builder));
        self
    }

    pub fn register(&mut self, kind: ChannelKind, builder: Arc<dyn ChannelBuilder>) {
        if self.builders.insert(kind, builder).is_some() {
            debug!(channel = %kind, "Replaced channel builder");
        }
    }

    pub fn supports(&self, kind: ChannelKind) -> bool {
        self.builders.contains_key(&kind)
    }
}

impl DefaultBuilder for ChannelRegistry {
    fn build(
        &self,
        receiver: &ReceiverConfig,
        template: &Arc<Template>,
        excluded: &[ChannelKind],
    ) -> Result<Vec<BuiltNotifier>, MultiError> {
        let mut errs = MultiError::new();
        let mut built = Vec::new();

        for (kind, instances) in receiver.channels() {
            if excluded.contains(&kind) {
                continue;
            }
            for (index, config) in instances.into_iter().enumerate() {
                let id = IntegrationId::new(&receiver.name, kind, index);
                let span = info_span!("build_integration", integration = %id);
                let _enter = span.enter();

                let result = match self.builders.get(&kind) {
                    Some(builder) => builder.build(&config, template),
                    None => Err(ConfigError::UnsupportedChannel(kind)),
                };
                match result {
                    Ok(notifier) => built.push(BuiltNotifier {
                        notifier,
                        resolved_sender: Arc::new(config),
                        kind,
                        index,
                    }),
                    Err(err) => {
                        warn!(error = %err, "Failed to build integration");
                        errs.add(BuildError::new(id, err));
                    }
                }
            }
        }

        errs.into_result()?;
        Ok(built)
    }
}
