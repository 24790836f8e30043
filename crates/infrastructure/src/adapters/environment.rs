//! Environment provider adapters

use std::env;

use globenv_application::ports::{EnvironmentError, EnvironmentProvider};
use globenv_domain::{GlobalStore, VariableMap};

/// Snapshot of the current process environment.
///
/// Variables whose name or value is not valid Unicode are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    /// Creates a new process environment provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EnvironmentProvider for ProcessEnvironment {
    fn environment(&self) -> Result<VariableMap, EnvironmentError> {
        Ok(env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect())
    }
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticEnvironment {
    variables: VariableMap,
}

impl StaticEnvironment {
    /// Creates a provider that always returns `variables`.
    #[must_use]
    pub const fn new(variables: VariableMap) -> Self {
        Self { variables }
    }

    /// Captures `base` and lays the global store over it, the way a host
    /// exposes its global variables to every job. Store values win.
    ///
    /// # Errors
    /// Returns an error if `base` cannot produce its environment.
    pub fn layered<P>(base: &P, store: Option<&GlobalStore>) -> Result<Self, EnvironmentError>
    where
        P: EnvironmentProvider + ?Sized,
    {
        let mut variables = base.environment()?;
        if let Some(store) = store {
            variables.extend(
                store
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string())),
            );
        }
        Ok(Self::new(variables))
    }

    /// Returns the variables.
    #[must_use]
    pub const fn variables(&self) -> &VariableMap {
        &self.variables
    }
}

impl EnvironmentProvider for StaticEnvironment {
    fn environment(&self) -> Result<VariableMap, EnvironmentError> {
        Ok(self.variables.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(entries: &[(&str, &str)]) -> VariableMap {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_process_environment_contains_path() {
        let snapshot = ProcessEnvironment::new().environment().unwrap();
        if let Ok(path) = env::var("PATH") {
            assert_eq!(snapshot.get("PATH"), Some(&path));
        }
    }

    #[test]
    fn test_static_environment_returns_copy() {
        let provider = StaticEnvironment::new(map(&[("a", "1")]));
        assert_eq!(provider.environment().unwrap(), map(&[("a", "1")]));
    }

    #[test]
    fn test_layered_store_values_win() {
        let base = StaticEnvironment::new(map(&[("HOME", "/home/ci"), ("globalVar", "process")]));
        let store = GlobalStore::from_variables(map(&[("globalVar", "globalValue")]));

        let layered = StaticEnvironment::layered(&base, Some(&store)).unwrap();
        assert_eq!(
            layered.variables(),
            &map(&[("HOME", "/home/ci"), ("globalVar", "globalValue")])
        );
    }

    #[test]
    fn test_layered_without_store() {
        let base = StaticEnvironment::new(map(&[("a", "1")]));
        let layered = StaticEnvironment::layered(&base, None).unwrap();
        assert_eq!(layered, base);
    }
}
