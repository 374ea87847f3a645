//! An already-loaded notification template set.
//!
//! Rendering is done by the channel implementations; this handle only carries
//! the external URL and the named definitions they look up.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    external_url: String,
    definitions: BTreeMap<String, String>,
}

impl Template {
    pub fn new(external_url: impl Into<String>) -> Self {
        Self {
            external_url: external_url.into(),
            definitions: BTreeMap::new(),
        }
    }

    pub fn with_definitions(mut self, definitions: BTreeMap<String, String>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    pub fn external_url(&self) -> &str {
        &self.external_url
    }

    pub fn definition(&self, name: &str) -> Option<&str> {
        self.definitions.get(name).map(String::as_str)
    }
}
