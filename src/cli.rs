//! Command-Line Interface (CLI) argument parsing.
//!
//! Arguments are parsed at startup and merged last over the configuration
//! file and environment variables.

use clap::{Parser, Subcommand};
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Builds and exercises alert receiver integrations.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Logging level (overridden by RUST_LOG).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Receiver YAML file; replaces the files listed in the configuration.
    #[arg(long = "receiver-file", value_name = "FILE")]
    pub receiver_files: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Assemble every receiver and report its integrations or build errors.
    Check {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Send one synthetic alert through every integration of a receiver.
    SendTest {
        /// Name of the receiver to notify.
        #[arg(long)]
        receiver: String,
        /// Send the alert as resolved instead of firing.
        #[arg(long)]
        resolved: bool,
    },
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        if !self.receiver_files.is_empty() {
            let files: Vec<String> = self
                .receiver_files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            dict.insert("receiver_files".into(), Value::from(files));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
