//! Builders with scripted results for exercising the assembler.

use super::mock_notifier::RecordingNotifier;
use alertdispatch::core::{Notifier, NotifyOutcome};
use alertdispatch::notification::{BuiltNotifier, ChannelBuilder, DefaultBuilder, MultiError};
use alertdispatch::receiver::{ChannelConfig, ChannelKind, ConfigError, ReceiverConfig};
use alertdispatch::template::Template;
use std::sync::{Arc, Mutex};

/// A channel builder that validates each config and counts its invocations.
#[derive(Default)]
pub struct CountingBuilder {
    pub built: Mutex<Vec<ChannelConfig>>,
}

impl CountingBuilder {
    pub fn calls(&self) -> usize {
        self.built.lock().unwrap().len()
    }
}

impl ChannelBuilder for CountingBuilder {
    fn build(
        &self,
        config: &ChannelConfig,
        _template: &Arc<Template>,
    ) -> Result<Arc<dyn Notifier>, ConfigError> {
        self.built.lock().unwrap().push(config.clone());
        config.validate()?;
        Ok(RecordingNotifier::new(NotifyOutcome::delivered()))
    }
}

/// A default builder that returns a canned result and records the exclusions
/// it was asked to honour.
pub struct StubDefaultBuilder {
    kinds: Vec<(ChannelKind, usize)>,
    error: Option<MultiError>,
    pub excluded: Mutex<Vec<Vec<ChannelKind>>>,
}

impl StubDefaultBuilder {
    /// Yields one notifier per `(kind, index)` pair, ignoring exclusions.
    pub fn returning(kinds: Vec<(ChannelKind, usize)>) -> Self {
        Self {
            kinds,
            error: None,
            excluded: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: MultiError) -> Self {
        Self {
            kinds: Vec::new(),
            error: Some(error),
            excluded: Mutex::new(Vec::new()),
        }
    }
}

struct AlwaysResolved;

impl alertdispatch::core::ResolvedSender for AlwaysResolved {
    fn send_resolved(&self) -> bool {
        true
    }
}

impl DefaultBuilder for StubDefaultBuilder {
    fn build(
        &self,
        _receiver: &ReceiverConfig,
        _template: &Arc<Template>,
        excluded: &[ChannelKind],
    ) -> Result<Vec<BuiltNotifier>, MultiError> {
        self.excluded.lock().unwrap().push(excluded.to_vec());
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        Ok(self
            .kinds
            .iter()
            .map(|(kind, index)| BuiltNotifier {
                notifier: RecordingNotifier::new(NotifyOutcome::delivered()),
                resolved_sender: Arc::new(AlwaysResolved),
                kind: *kind,
                index: *index,
            })
            .collect())
    }
}
