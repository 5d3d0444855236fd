//! API version lookup by resource type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// API versions keyed by resource provider namespace or full resource type.
///
/// Lookups try the full type first and then each shorter `/`-separated
/// prefix, so `Microsoft.Network/dnsZones` can pin its own version while the
/// rest of `Microsoft.Network` shares one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ApiVersions {
    versions: BTreeMap<String, String>,
}

impl Default for ApiVersions {
    fn default() -> Self {
        Self::empty()
            .with("Microsoft.Authorization", "2015-07-01")
            .with("Microsoft.Compute", "2019-03-01")
            .with("Microsoft.ManagedIdentity", "2018-11-30")
            .with("Microsoft.Network", "2019-07-01")
            .with("Microsoft.Network/dnsZones", "2018-05-01")
            .with("Microsoft.Storage", "2019-04-01")
    }
}

impl ApiVersions {
    /// A table with no entries.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            versions: BTreeMap::new(),
        }
    }

    /// Add or replace an entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, version: impl Into<String>) -> Self {
        self.insert(key, version);
        self
    }

    /// Add or replace an entry, returning the previous version.
    pub fn insert(&mut self, key: impl Into<String>, version: impl Into<String>) -> Option<String> {
        self.versions.insert(key.into(), version.into())
    }

    /// Version for `resource_type`, matching the longest known prefix.
    #[must_use]
    pub fn resolve(&self, resource_type: &str) -> Option<&str> {
        let mut candidate = resource_type;
        loop {
            if let Some(version) = self.versions.get(candidate) {
                return Some(version.as_str());
            }
            candidate = &candidate[..candidate.rfind('/')?];
        }
    }

    /// Version for `resource_type`, failing when none is configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when no entry matches.
    pub fn require(&self, resource_type: &str) -> Result<&str> {
        self.resolve(resource_type)
            .ok_or_else(|| Error::invalid_config(format!("no API version configured for {resource_type}")))
    }

    /// Parse and validate a table from a JSON object of strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed input and
    /// [`Error::InvalidConfig`] for empty keys or versions.
    pub fn from_json(input: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(input)?;
        table.validate()?;
        Ok(table)
    }

    /// Check that every entry has a key and a version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first bad entry.
    pub fn validate(&self) -> Result<()> {
        for (key, version) in &self.versions {
            if key.is_empty() {
                return Err(Error::invalid_config("API version entry with empty resource type"));
            }
            if version.is_empty() {
                return Err(Error::invalid_config(format!("empty API version for {key}")));
            }
        }
        Ok(())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
