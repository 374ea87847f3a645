//! Turns one receiver config into its ordered list of decorated integrations.
//!
//! Channel types without an override are built by the default builder. Each
//! overridden type is built here, instance by instance, by its dedicated
//! builder. An override builder replaces the default for its type entirely,
//! even when the receiver has no instances of that type.

use crate::core::{Notifier, ResolvedSender};
use crate::notification::builder::{ChannelBuilder, DefaultBuilder};
use crate::notification::error::{AssembleError, BuildError, MultiError};
use crate::notification::identity::IntegrationId;
use crate::notification::integration::Integration;
use crate::notification::observed::ObservedNotifier;
use crate::receiver::{ChannelKind, ReceiverConfig};
use crate::template::Template;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info_span, instrument, warn};

pub struct Assembler {
    default: Arc<dyn DefaultBuilder>,
    overrides: BTreeMap<ChannelKind, Arc<dyn ChannelBuilder>>,
    overridden: Vec<ChannelKind>,
}

impl Assembler {
    /// Creates an assembler. Overrides are iterated in channel-type order.
    pub fn new<I>(default: Arc<dyn DefaultBuilder>, overrides: I) -> Self
    where
        I: IntoIterator<Item = (ChannelKind, Arc<dyn ChannelBuilder>)>,
    {
        let overrides: BTreeMap<_, _> = overrides.into_iter().collect();
        let overridden = overrides.keys().copied().collect();
        Self {
            default,
            overrides,
            overridden,
        }
    }

    /// An assembler that builds everything with the default builder.
    pub fn without_overrides(default: Arc<dyn DefaultBuilder>) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
            overridden: Vec::new(),
        }
    }

    pub fn overridden(&self) -> &[ChannelKind] {
        &self.overridden
    }

    /// Builds every integration of `receiver`.
    ///
    /// Default integrations come first in the default builder's order,
    /// followed by overridden types with their instances in config order.
    /// Override failures do not stop the loop; if any occurred, no
    /// integrations are returned and the error lists each of them.
    #[instrument(skip_all, fields(receiver = %receiver.name))]
    pub fn assemble(
        &self,
        receiver: &ReceiverConfig,
        template: &Arc<Template>,
    ) -> Result<Vec<Integration>, AssembleError> {
        receiver
            .validate_name()
            .map_err(AssembleError::InvalidReceiver)?;

        let built = self
            .default
            .build(receiver, template, &self.overridden)
            .map_err(AssembleError::Default)?;

        let defaults: Vec<Integration> = built
            .into_iter()
            .filter(|b| !self.overrides.contains_key(&b.kind))
            .map(|b| {
                let id = IntegrationId::new(&receiver.name, b.kind, b.index);
                decorate(b.notifier, b.resolved_sender, id)
            })
            .collect();

        let (integrations, errs) = self.overrides.iter().fold(
            (defaults, MultiError::new()),
            |acc, (kind, builder)| {
                build_overridden(receiver, template, *kind, builder.as_ref(), acc)
            },
        );

        errs.into_result().map_err(AssembleError::Overrides)?;
        debug!(count = integrations.len(), "Assembled receiver integrations");
        Ok(integrations)
    }
}

/// Builds every configured instance of one overridden channel type, appending
/// successes and failures to the accumulator.
fn build_overridden(
    receiver: &ReceiverConfig,
    template: &Arc<Template>,
    kind: ChannelKind,
    builder: &dyn ChannelBuilder,
    (mut integrations, mut errs): (Vec<Integration>, MultiError),
) -> (Vec<Integration>, MultiError) {
    for (index, config) in receiver.instances(kind).into_iter().enumerate() {
        let id = IntegrationId::new(&receiver.name, kind, index);
        let span = info_span!("build_integration", integration = %id);
        match span.in_scope(|| builder.build(&config, template)) {
            Ok(notifier) => integrations.push(decorate(notifier, Arc::new(config), id)),
            Err(err) => {
                warn!(integration = %id, error = %err, "Failed to build integration");
                errs.add(BuildError::new(id, err));
            }
        }
    }
    (integrations, errs)
}

fn decorate(
    notifier: Arc<dyn Notifier>,
    resolved_sender: Arc<dyn ResolvedSender>,
    id: IntegrationId,
) -> Integration {
    let observed = ObservedNotifier::new(notifier, id.clone());
    Integration::new(Arc::new(observed), resolved_sender, id)
}
