//! Core domain types and service traits for alert dispatch
//!
//! This module defines the alert batch handed to every integration, the
//! single-method dispatch capability (`Notifier`) and the result pair that
//! dispatch produces.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::watch;

/// A single alert as delivered to an integration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Alert {
    /// Identifying labels of the alert
    pub labels: BTreeMap<String, String>,
    /// Informational annotations (summary, description, runbook, ...)
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// When the alert started firing
    pub starts_at: DateTime<Utc>,
    /// When the alert stopped firing, if it has
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    /// Link back to the entity that generated the alert
    #[serde(default)]
    pub generator_url: String,
}

/// Whether an alert is still firing at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Firing,
    Resolved,
}

impl Alert {
    /// Creates a firing alert carrying only an `alertname` label.
    pub fn firing(name: &str, starts_at: DateTime<Utc>) -> Self {
        Self {
            labels: BTreeMap::from([("alertname".to_string(), name.to_string())]),
            starts_at,
            ..Default::default()
        }
    }

    /// The alert's name label, or an empty string.
    pub fn name(&self) -> &str {
        self.labels.get("alertname").map(String::as_str).unwrap_or_default()
    }

    /// An alert is resolved once its end time is set and not in the future.
    pub fn status_at(&self, now: DateTime<Utc>) -> AlertStatus {
        match self.ends_at {
            Some(ends_at) if ends_at <= now => AlertStatus::Resolved,
            _ => AlertStatus::Firing,
        }
    }
}

/// Per-dispatch context shared by every integration invoked for an alert group.
#[derive(Debug, Clone, Default)]
pub struct NotifyContext {
    /// Key of the alert group being notified
    pub group_key: String,
    /// Name of the receiver the group was routed to
    pub receiver: String,
    /// Labels common to the whole group
    pub group_labels: BTreeMap<String, String>,
    /// Set to `true` when the dispatcher is shutting down
    pub shutdown: Option<watch::Receiver<bool>>,
}

impl NotifyContext {
    pub fn new(group_key: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self {
            group_key: group_key.into(),
            receiver: receiver.into(),
            ..Default::default()
        }
    }

    /// Attaches a shutdown signal that notifiers may honour.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }
}

/// Errors a notifier may report for one dispatch call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("endpoint rejected notification: status {status}, body: {body}")]
    Rejected { status: u16, body: String },

    #[error("template error: {0}")]
    Template(String),

    #[error("notification cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

/// The result of one dispatch call: whether the scheduler should retry, and
/// the error (if any). The two are independent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotifyOutcome {
    pub retry: bool,
    pub error: Option<NotifyError>,
}

impl NotifyOutcome {
    pub fn delivered() -> Self {
        Self::default()
    }

    pub fn retryable(error: NotifyError) -> Self {
        Self {
            retry: true,
            error: Some(error),
        }
    }

    pub fn failed(error: NotifyError) -> Self {
        Self {
            retry: false,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<(), NotifyError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Service Traits
// =============================================================================

/// Delivers a batch of alerts to one external channel endpoint.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends the batch.
    ///
    /// # Returns
    /// * `retry` - whether the dispatch scheduler should attempt again later
    /// * `error` - `None` on success
    async fn notify(&self, ctx: &NotifyContext, alerts: &[Alert]) -> NotifyOutcome;
}

/// Answers whether an integration instance wants resolved notifications.
pub trait ResolvedSender: Send + Sync {
    fn send_resolved(&self) -> bool;
}
