/// AlertDispatch - receiver integration assembly for alert notifications
///
/// This library turns declarative receiver configs into executable,
/// independently invokable notification integrations.
pub mod notification;

pub mod cli;
pub mod config;
pub mod core;
pub mod receiver;
pub mod services;
pub mod template;

// Re-export core types for convenience
pub use crate::core::*;
pub use receiver::{ChannelConfig, ChannelKind, ConfigError, ReceiverConfig};
pub use template::Template;
