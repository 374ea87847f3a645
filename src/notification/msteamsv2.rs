//! Dedicated builder for Microsoft Teams (workflows) integrations.
//!
//! Replaces the default `msteamsv2` builder so every instance carries the
//! title-link template used for the card heading.

use crate::core::Notifier;
use crate::notification::builder::ChannelBuilder;
use crate::notification::log_notifier::LogNotifier;
use crate::receiver::{ChannelConfig, ChannelKind, ConfigError};
use crate::template::Template;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_TITLE_LINK_TEMPLATE: &str = r#"{{ template "msteamsv2.default.titleLink" . }}"#;

/// Name of the definition the default title link refers to.
pub const TITLE_LINK_DEFINITION: &str = "msteamsv2.default.titleLink";

#[derive(Debug, Clone)]
pub struct MsTeamsV2Builder {
    title_link_template: String,
}

impl MsTeamsV2Builder {
    pub fn new(title_link_template: impl Into<String>) -> Self {
        Self {
            title_link_template: title_link_template.into(),
        }
    }
}

impl Default for MsTeamsV2Builder {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_LINK_TEMPLATE)
    }
}

impl ChannelBuilder for MsTeamsV2Builder {
    fn build(
        &self,
        config: &ChannelConfig,
        template: &Arc<Template>,
    ) -> Result<Arc<dyn Notifier>, ConfigError> {
        let ChannelConfig::MsTeamsV2(teams) = config else {
            return Err(ConfigError::Invalid {
                field: "msteamsv2_configs",
                reason: format!("expected an msteamsv2 config, got {}", config.kind()),
            });
        };
        config.validate()?;

        if self.title_link_template.contains(TITLE_LINK_DEFINITION)
            && template.definition(TITLE_LINK_DEFINITION).is_none()
        {
            debug!(
                definition = TITLE_LINK_DEFINITION,
                "Title link definition not loaded, falling back to the external URL"
            );
        }

        let title = teams.title.as_deref().unwrap_or("");
        let detail = format!("title={:?} title_link={}", title, self.title_link_template);
        Ok(Arc::new(
            LogNotifier::new(ChannelKind::MsTeamsV2).with_detail(detail),
        ))
    }
}
