//! Configuration management for AlertDispatch
//!
//! The main `Config` is layered with `figment`: built-in defaults, an
//! optional `alertdispatch.toml`, `ALERTDISPATCH_*` environment variables and
//! finally command-line arguments. Receivers live in separate YAML files in
//! the Alertmanager `receivers:` layout.

use crate::cli::Cli;
use crate::receiver::{ChannelKind, ReceiverConfig};
use crate::template::Template;
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::PathBuf;

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Base URL used in links back to the alerting UI.
    pub external_url: String,
    /// Named template definitions made available to every channel.
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
    /// YAML files containing a `receivers:` list.
    #[serde(default)]
    pub receiver_files: Vec<PathBuf>,
    /// Channel types built by a dedicated builder instead of the default one.
    #[serde(default)]
    pub overrides: Vec<ChannelKind>,
}

/// Layout of a receiver file.
#[derive(Debug, Deserialize)]
struct ReceiverFile {
    #[serde(default)]
    receivers: Vec<ReceiverConfig>,
}

impl Config {
    /// Loads the application configuration by layering every source.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = &cli.config {
            figment = figment.merge(Toml::file(path));
        }
        let config: Config = figment
            // e.g. ALERTDISPATCH_LOG_LEVEL=debug
            .merge(Env::prefixed("ALERTDISPATCH_"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }

    /// Reads every receiver file, in order.
    pub fn load_receivers(&self) -> Result<Vec<ReceiverConfig>> {
        let mut receivers = Vec::new();
        for path in &self.receiver_files {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read receiver file: {}", path.display()))?;
            let file: ReceiverFile = serde_yml::from_str(&content).with_context(|| {
                format!("Failed to parse YAML from receiver file: {}", path.display())
            })?;
            receivers.extend(file.receivers);
        }

        let mut seen = HashSet::new();
        for receiver in &receivers {
            if !seen.insert(receiver.name.as_str()) {
                bail!("Duplicate receiver name: {:?}", receiver.name);
            }
        }
        Ok(receivers)
    }

    /// The template handle shared by every integration.
    pub fn template(&self) -> Template {
        Template::new(&self.external_url).with_definitions(self.templates.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            external_url: "http://localhost:9093".to_string(),
            templates: BTreeMap::new(),
            receiver_files: vec![],
            overrides: vec![ChannelKind::MsTeamsV2],
        }
    }
}
