//! Addressing of one configured channel instance within one receiver.

use crate::receiver::ChannelKind;
use std::fmt;

/// The (receiver, channel type, index) triple. Displays as
/// `<receiver>/<channel>[<index>]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntegrationId {
    pub receiver: String,
    pub kind: ChannelKind,
    pub index: usize,
}

impl IntegrationId {
    pub fn new(receiver: impl Into<String>, kind: ChannelKind, index: usize) -> Self {
        Self {
            receiver: receiver.into(),
            kind,
            index,
        }
    }
}

impl fmt::Display for IntegrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}[{}]", self.receiver, self.kind, self.index)
    }
}
