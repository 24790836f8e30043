//! In-memory global configuration store.

use globenv_application::ports::{GlobalStoreAccessor, StoreError};
use globenv_domain::{GlobalConfiguration, GlobalStore};

/// Global configuration held in memory, for embedding hosts and tests.
///
/// `persist` only records that it was called.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGlobalConfiguration {
    configuration: GlobalConfiguration,
    persist_count: usize,
}

impl InMemoryGlobalConfiguration {
    /// Creates an empty configuration with no variable store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the configuration as currently held.
    #[must_use]
    pub const fn configuration(&self) -> &GlobalConfiguration {
        &self.configuration
    }

    /// Returns how many times the configuration was persisted.
    #[must_use]
    pub const fn persist_count(&self) -> usize {
        self.persist_count
    }
}

impl GlobalStoreAccessor for InMemoryGlobalConfiguration {
    fn get_or_create(&mut self) -> &mut GlobalStore {
        self.configuration.store_or_create()
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        self.persist_count += 1;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_reuses_store() {
        let mut config = InMemoryGlobalConfiguration::new();
        config.get_or_create().set("a", "1").unwrap();
        config.get_or_create().set("b", "2").unwrap();

        let store = config.configuration().store().unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_persist_is_counted() {
        let mut config = InMemoryGlobalConfiguration::new();
        config.persist().unwrap();
        config.persist().unwrap();
        assert_eq!(config.persist_count(), 2);
    }
}
