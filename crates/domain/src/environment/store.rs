//! Global variable store
//!
//! The long-lived key/value section of the host configuration that resolved
//! variables are merged into.

use serde::{Deserialize, Serialize};

use super::VariableMap;
use crate::error::{DomainError, DomainResult};

/// Host-wide variables visible to every job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalStore {
    variables: VariableMap,
}

impl GlobalStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given variables.
    #[must_use]
    pub const fn from_variables(variables: VariableMap) -> Self {
        Self { variables }
    }

    /// Gets a variable value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Sets a variable, overwriting any existing value.
    ///
    /// Returns the previous value, if any.
    ///
    /// # Errors
    /// Returns `DomainError::EmptyVariableName` if `name` is empty.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> DomainResult<Option<String>> {
        let name = name.into();
        let value = value.into();
        if name.is_empty() {
            return Err(DomainError::EmptyVariableName { value });
        }
        Ok(self.variables.insert(name, value))
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if the store has no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Checks that every variable has a non-empty name.
    ///
    /// Needed for stores that were deserialized rather than built with
    /// [`GlobalStore::set`].
    ///
    /// # Errors
    /// Returns `DomainError::EmptyVariableName` for the first empty name.
    pub fn validate(&self) -> DomainResult<()> {
        match self.variables.get("") {
            Some(value) => Err(DomainError::EmptyVariableName {
                value: value.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Returns the underlying variable map.
    #[must_use]
    pub const fn variables(&self) -> &VariableMap {
        &self.variables
    }
}
