//! AlertDispatch - receiver integration checker
//!
//! Loads receiver definitions, assembles their integrations and either
//! reports the result or pushes a synthetic alert through them.

use alertdispatch::{
    cli::{Cli, Command},
    config::Config,
    core::{Alert, NotifyContext},
    services::{build_assembler, dispatch, setup_receivers, ReceiverSummary},
};
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).unwrap_or_else(|err| {
        tracing_subscriber::fmt().init();
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("AlertDispatch starting up...");
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("External URL: {}", config.external_url);
    info!("Receiver Files: {}", config.receiver_files.len());
    info!("Template Definitions: {}", config.templates.len());
    info!(
        "Overridden Channels: {}",
        config
            .overrides
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!("-------------------------------------------------------");

    let receivers = config.load_receivers()?;
    if receivers.is_empty() {
        warn!("No receivers configured.");
    }
    let template = Arc::new(config.template());
    let assembler = build_assembler(&config);

    match cli.command {
        Command::Check { json } => {
            let reports = setup_receivers(&assembler, &receivers, &template);
            let summaries: Vec<ReceiverSummary> = reports.iter().map(|r| r.summary()).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for summary in &summaries {
                    for id in &summary.integrations {
                        println!("ok    {}", id);
                    }
                    for err in &summary.errors {
                        println!("error {}: {}", summary.receiver, err);
                    }
                }
            }
            if summaries.iter().any(|s| !s.errors.is_empty()) {
                std::process::exit(1);
            }
        }
        Command::SendTest { receiver, resolved } => {
            let receiver_config = receivers
                .iter()
                .find(|r| r.name == receiver)
                .ok_or_else(|| anyhow!("Unknown receiver: {}", receiver))?;
            let integrations = assembler.assemble(receiver_config, &template)?;

            let now = Utc::now();
            let mut alert = Alert::firing("AlertDispatchTest", now - Duration::minutes(1));
            alert
                .annotations
                .insert("summary".to_string(), "Synthetic test alert".to_string());
            if resolved {
                alert.ends_at = Some(now);
            }

            let ctx = NotifyContext::new(format!("{{}}:{{receiver=\"{}\"}}", receiver), &receiver);
            let results = dispatch(&integrations, &ctx, &[alert], now).await;
            let mut failed = false;
            for (id, outcome) in results {
                match outcome.error {
                    None => println!("ok    {}", id),
                    Some(err) => {
                        failed = true;
                        println!("error {} (retry={}): {}", id, outcome.retry, err);
                    }
                }
            }
            if failed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
