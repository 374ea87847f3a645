#![allow(dead_code)]
pub mod mock_notifier;
pub mod stub_builder;

use alertdispatch::receiver::{
    EmailConfig, MsTeamsV2Config, ReceiverConfig, WebhookConfig,
};

pub fn email(to: &str) -> EmailConfig {
    EmailConfig {
        to: to.to_string(),
        ..Default::default()
    }
}

pub fn webhook(url: &str) -> WebhookConfig {
    WebhookConfig {
        send_resolved: true,
        url: url.to_string(),
        max_alerts: 0,
    }
}

pub fn teams(url: &str) -> MsTeamsV2Config {
    MsTeamsV2Config {
        send_resolved: true,
        webhook_url: url.to_string(),
        title: None,
        text: None,
    }
}

/// A receiver with `emails` email instances and the given Teams webhook URLs.
pub fn receiver(name: &str, emails: usize, teams_urls: &[&str]) -> ReceiverConfig {
    let mut receiver = ReceiverConfig::new(name);
    receiver.email_configs = (0..emails)
        .map(|i| email(&format!("ops{}@example.com", i)))
        .collect();
    receiver.msteamsv2_configs = teams_urls.iter().map(|url| teams(url)).collect();
    receiver
}
