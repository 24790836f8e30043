//! Host-wide global configuration document
//!
//! Holds the global variable store alongside any other host settings, which
//! are carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::store::GlobalStore;
use crate::error::{DomainError, DomainResult};

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// The host's global configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfiguration {
    /// Schema version for migration support.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Global environment variables, absent until first created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<GlobalStore>,

    /// Sections owned by other parts of the host.
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

const fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl Default for GlobalConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalConfiguration {
    /// Creates an empty configuration with no variable store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            environment_variables: None,
            other: BTreeMap::new(),
        }
    }

    /// Creates a configuration that already holds `store`.
    #[must_use]
    pub fn with_store(store: GlobalStore) -> Self {
        Self {
            environment_variables: Some(store),
            ..Self::new()
        }
    }

    /// Returns the variable store, if one has been attached.
    #[must_use]
    pub const fn store(&self) -> Option<&GlobalStore> {
        self.environment_variables.as_ref()
    }

    /// Returns the variable store, attaching an empty one first if absent.
    ///
    /// An existing store is reused, never replaced.
    pub fn store_or_create(&mut self) -> &mut GlobalStore {
        self.environment_variables
            .get_or_insert_with(GlobalStore::new)
    }

    /// Checks that this document can be handled by this build.
    ///
    /// # Errors
    /// Returns `DomainError::UnsupportedSchemaVersion` for newer schemas and
    /// `DomainError::EmptyVariableName` if the store has an empty name.
    pub fn validate(&self) -> DomainResult<()> {
        if self.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(DomainError::UnsupportedSchemaVersion(self.schema_version));
        }
        self.environment_variables
            .as_ref()
            .map_or(Ok(()), GlobalStore::validate)
    }
}
