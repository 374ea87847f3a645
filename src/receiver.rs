//! Receiver configuration: one named receiver holding ordered lists of
//! channel-specific configs.
//!
//! The field names follow the Alertmanager `receivers:` layout so receiver
//! files can be shared with it.

use crate::core::ResolvedSender;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// A category of delivery mechanism.
///
/// Declaration order is the order in which channel types are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Slack,
    Webhook,
    #[serde(rename = "msteamsv2")]
    MsTeamsV2,
    Pagerduty,
    Opsgenie,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 6] = [
        ChannelKind::Email,
        ChannelKind::Slack,
        ChannelKind::Webhook,
        ChannelKind::MsTeamsV2,
        ChannelKind::Pagerduty,
        ChannelKind::Opsgenie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Email => "email",
            ChannelKind::Slack => "slack",
            ChannelKind::Webhook => "webhook",
            ChannelKind::MsTeamsV2 => "msteamsv2",
            ChannelKind::Pagerduty => "pagerduty",
            ChannelKind::Opsgenie => "opsgenie",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Problems found in a receiver or channel config.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("receiver name must not be empty")]
    EmptyReceiverName,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a valid http(s) URL: {value:?}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("field `{field}` is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("no builder registered for channel type `{0}`")]
    UnsupportedChannel(ChannelKind),
}

fn default_true() -> bool {
    true
}

fn require(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField(field));
    }
    Ok(())
}

fn require_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    require(field, value)?;
    let invalid = || ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
    };
    let url = Url::parse(value).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        _ => Err(invalid()),
    }
}

/// Email channel config.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct EmailConfig {
    #[serde(default)]
    pub send_resolved: bool,
    pub to: String,
    #[serde(default)]
    pub from: Option<String>,
    /// `host:port` of the SMTP relay.
    #[serde(default)]
    pub smarthost: Option<String>,
}

impl EmailConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require("to", &self.to)?;
        if let Some(smarthost) = &self.smarthost {
            let parsed = Url::parse(&format!("smtp://{}", smarthost)).ok();
            let valid = parsed.is_some_and(|url| {
                url.host_str().is_some_and(|h| !h.is_empty())
                    && url.port().is_some()
                    && url.path().is_empty()
            });
            if !valid {
                return Err(ConfigError::Invalid {
                    field: "smarthost",
                    reason: format!("expected host:port, got {:?}", smarthost),
                });
            }
        }
        Ok(())
    }
}

/// Slack channel config.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SlackConfig {
    #[serde(default = "default_true")]
    pub send_resolved: bool,
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub channel: Option<String>,
}

/// Generic webhook channel config.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WebhookConfig {
    #[serde(default = "default_true")]
    pub send_resolved: bool,
    pub url: String,
    /// Upper bound on alerts per payload, 0 means unlimited.
    #[serde(default)]
    pub max_alerts: usize,
}

/// Microsoft Teams (workflows) channel config.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MsTeamsV2Config {
    #[serde(default = "default_true")]
    pub send_resolved: bool,
    pub webhook_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// PagerDuty channel config. Exactly one of the keys must be set.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PagerdutyConfig {
    #[serde(default = "default_true")]
    pub send_resolved: bool,
    #[serde(default)]
    pub routing_key: Option<String>,
    #[serde(default)]
    pub service_key: Option<String>,
}

/// Opsgenie channel config.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OpsgenieConfig {
    #[serde(default = "default_true")]
    pub send_resolved: bool,
    pub api_key: String,
    #[serde(default)]
    pub api_url: Option<String>,
}

/// One configured instance of one channel type.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelConfig {
    Email(EmailConfig),
    Slack(SlackConfig),
    Webhook(WebhookConfig),
    MsTeamsV2(MsTeamsV2Config),
    Pagerduty(PagerdutyConfig),
    Opsgenie(OpsgenieConfig),
}

impl ChannelConfig {
    pub fn kind(&self) -> ChannelKind {
        match self {
            ChannelConfig::Email(_) => ChannelKind::Email,
            ChannelConfig::Slack(_) => ChannelKind::Slack,
            ChannelConfig::Webhook(_) => ChannelKind::Webhook,
            ChannelConfig::MsTeamsV2(_) => ChannelKind::MsTeamsV2,
            ChannelConfig::Pagerduty(_) => ChannelKind::Pagerduty,
            ChannelConfig::Opsgenie(_) => ChannelKind::Opsgenie,
        }
    }

    /// Checks the fields every delivery of this channel type relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            ChannelConfig::Email(c) => c.validate(),
            ChannelConfig::Slack(c) => require_url("api_url", &c.api_url),
            ChannelConfig::Webhook(c) => require_url("url", &c.url),
            ChannelConfig::MsTeamsV2(c) => require_url("webhook_url", &c.webhook_url),
            ChannelConfig::Pagerduty(c) => match (&c.routing_key, &c.service_key) {
                (Some(key), None) => require("routing_key", key),
                (None, Some(key)) => require("service_key", key),
                (None, None) => Err(ConfigError::MissingField("routing_key")),
                (Some(_), Some(_)) => Err(ConfigError::Invalid {
                    field: "routing_key",
                    reason: "routing_key and service_key are mutually exclusive".to_string(),
                }),
            },
            ChannelConfig::Opsgenie(c) => {
                require("api_key", &c.api_key)?;
                match &c.api_url {
                    Some(url) => require_url("api_url", url),
                    None => Ok(()),
                }
            }
        }
    }
}

impl ResolvedSender for ChannelConfig {
    fn send_resolved(&self) -> bool {
        match self {
            ChannelConfig::Email(c) => c.send_resolved,
            ChannelConfig::Slack(c) => c.send_resolved,
            ChannelConfig::Webhook(c) => c.send_resolved,
            ChannelConfig::MsTeamsV2(c) => c.send_resolved,
            ChannelConfig::Pagerduty(c) => c.send_resolved,
            ChannelConfig::Opsgenie(c) => c.send_resolved,
        }
    }
}

/// A named logical destination for alerts.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct ReceiverConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub email_configs: Vec<EmailConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slack_configs: Vec<SlackConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub webhook_configs: Vec<WebhookConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub msteamsv2_configs: Vec<MsTeamsV2Config>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pagerduty_configs: Vec<PagerdutyConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opsgenie_configs: Vec<OpsgenieConfig>,
}

impl ReceiverConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn validate_name(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyReceiverName);
        }
        Ok(())
    }

    /// The configured instances of one channel type, in config order.
    pub fn instances(&self, kind: ChannelKind) -> Vec<ChannelConfig> {
        fn wrap<T: Clone>(items: &[T], f: fn(T) -> ChannelConfig) -> Vec<ChannelConfig> {
            items.iter().cloned().map(f).collect()
        }
        match kind {
            ChannelKind::Email => wrap(&self.email_configs, ChannelConfig::Email),
            ChannelKind::Slack => wrap(&self.slack_configs, ChannelConfig::Slack),
            ChannelKind::Webhook => wrap(&self.webhook_configs, ChannelConfig::Webhook),
            ChannelKind::MsTeamsV2 => wrap(&self.msteamsv2_configs, ChannelConfig::MsTeamsV2),
            ChannelKind::Pagerduty => wrap(&self.pagerduty_configs, ChannelConfig::Pagerduty),
            ChannelKind::Opsgenie => wrap(&self.opsgenie_configs, ChannelConfig::Opsgenie),
        }
    }

    /// Every channel type with at least one instance, in build order.
    pub fn channels(&self) -> Vec<(ChannelKind, Vec<ChannelConfig>)> {
        ChannelKind::ALL
            .into_iter()
            .map(|kind| (kind, self.instances(kind)))
            .filter(|(_, instances)| !instances.is_empty())
            .collect()
    }

    /// Total number of configured channel instances.
    pub fn instance_count(&self) -> usize {
        self.channels().iter().map(|(_, instances)| instances.len()).sum()
    }
}
