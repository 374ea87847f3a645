//! Construction and decoration of receiver integrations.
//!
//! A receiver config is turned into a list of [`Integration`] handles, one per
//! configured channel instance, each addressable by its [`IntegrationId`] and
//! wrapped so every dispatch call is logged before and after delivery.
pub mod assembler;
pub mod builder;
pub mod error;
pub mod identity;
pub mod integration;
pub mod log_notifier;
pub mod msteamsv2;
pub mod observed;

pub use assembler::Assembler;
pub use builder::{BuiltNotifier, ChannelBuilder, ChannelRegistry, DefaultBuilder};
pub use error::{AssembleError, BuildError, MultiError};
pub use identity::IntegrationId;
pub use integration::Integration;
pub use log_notifier::{LogNotifier, LogNotifierBuilder};
pub use msteamsv2::MsTeamsV2Builder;
pub use observed::ObservedNotifier;
