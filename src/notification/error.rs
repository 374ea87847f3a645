//! Build-time errors for receiver integrations.

use crate::notification::identity::IntegrationId;
use crate::receiver::ConfigError;
use itertools::Itertools;
use std::fmt;
use thiserror::Error;

/// A single channel instance that failed to build.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{id}: {source}")]
pub struct BuildError {
    pub id: IntegrationId,
    #[source]
    pub source: ConfigError,
}

impl BuildError {
    pub fn new(id: IntegrationId, source: ConfigError) -> Self {
        Self { id, source }
    }
}

/// Every build failure collected during one assembly, in the order they occurred.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiError {
    errors: Vec<BuildError>,
}

impl MultiError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, err: BuildError) {
        self.errors.push(err);
    }

    pub fn extend(&mut self, other: MultiError) {
        self.errors.extend(other.errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[BuildError] {
        &self.errors
    }

    /// `Ok` when nothing was collected, so callers never see an empty error.
    pub fn into_result(self) -> Result<(), MultiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.errors.iter().join("; "))
    }
}

impl std::error::Error for MultiError {}

impl FromIterator<BuildError> for MultiError {
    fn from_iter<I: IntoIterator<Item = BuildError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MultiError {
    type Item = BuildError;
    type IntoIter = std::vec::IntoIter<BuildError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Why a receiver could not be turned into integrations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssembleError {
    #[error("invalid receiver: {0}")]
    InvalidReceiver(ConfigError),

    #[error("default integrations failed to build: {0}")]
    Default(MultiError),

    #[error("{count} integration(s) failed to build: {0}", count = .0.len())]
    Overrides(MultiError),
}

impl AssembleError {
    /// The per-instance failures behind this error.
    pub fn failures(&self) -> &[BuildError] {
        match self {
            AssembleError::InvalidReceiver(_) => &[],
            AssembleError::Default(errs) | AssembleError::Overrides(errs) => errs.errors(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receiver::ChannelKind;

    fn failure(index: usize) -> BuildError {
        BuildError::new(
            IntegrationId::new("r1", ChannelKind::Webhook, index),
            ConfigError::MissingField("url"),
        )
    }

    #[test]
    fn test_empty_multi_error_is_ok() {
        assert_eq!(MultiError::new().into_result(), Ok(()));
    }

    #[test]
    fn test_multi_error_display_lists_every_failure() {
        let errs: MultiError = vec![failure(0), failure(2)].into_iter().collect();
        assert_eq!(errs.len(), 2);
        assert_eq!(
            errs.to_string(),
            "r1/webhook[0]: missing required field `url`; r1/webhook[2]: missing required field `url`"
        );

        let err = AssembleError::Overrides(errs.clone());
        assert_eq!(err.failures().len(), 2);
        assert!(err.to_string().starts_with("2 integration(s) failed to build: "));
        assert_eq!(errs.into_result().unwrap_err().len(), 2);
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut first: MultiError = vec![failure(0)].into_iter().collect();
        first.extend(vec![failure(1)].into_iter().collect());
        let indexes: Vec<_> = first.into_iter().map(|e| e.id.index).collect();
        assert_eq!(indexes, vec![0, 1]);
    }
}
