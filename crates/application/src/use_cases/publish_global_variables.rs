//! Publish global variables use case
//!
//! Parses the configured variable text, resolves references and merges the
//! result into the host's global store.

use globenv_domain::{GlobalStore, VariableMap};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::ApplicationResult;
use crate::ports::{BuildLog, EnvironmentProvider, GlobalStoreAccessor};
use crate::properties::parse_properties;
use crate::variable_resolver::VariableResolver;

/// Tag prefixed to every build log line written by the publisher.
pub const LOG_PREFIX: &str = "[GlobalEnvironmentVariableUpdate] ";

fn print_log(log: &dyn BuildLog, message: &str) {
    log.println(&format!("{LOG_PREFIX}{message}"));
}

/// Parses `text` and resolves it against itself, then against `environment`.
///
/// Malformed text never fails: the problem is written to `log` and whatever
/// was read before it is resolved.
#[must_use]
pub fn resolve_variables(text: &str, environment: &VariableMap, log: &dyn BuildLog) -> VariableMap {
    let outcome = parse_properties(text);

    if let Some(error) = &outcome.error {
        warn!(%error, "variable text is malformed");
        print_log(log, "Could not parse environment variables");
        print_log(log, &error.to_string());
    }

    let mut variables = outcome.variables;
    let resolver = VariableResolver::default();
    resolver.resolve(&mut variables, environment);
    debug!(
        count = variables.len(),
        passes = resolver.max_passes(),
        "resolved variables"
    );
    variables
}

/// Sets every resolved variable in `store`, overwriting existing values.
///
/// Variables already in the store that are not in `resolved` are untouched.
///
/// # Errors
/// Returns a domain error if a variable name is rejected by the store.
pub fn merge_variables(
    store: &mut GlobalStore,
    resolved: &VariableMap,
    log: &dyn BuildLog,
) -> ApplicationResult<()> {
    for (name, value) in resolved {
        store.set(name.as_str(), value.as_str())?;
        print_log(log, &format!("{name}={value}"));
    }
    Ok(())
}

/// Resolves `text` and merges it into `store` in one step.
///
/// Returns the variables that were applied.
///
/// # Errors
/// Returns a domain error if a variable name is rejected by the store.
pub fn resolve_and_merge(
    text: &str,
    environment: &VariableMap,
    store: &mut GlobalStore,
    log: &dyn BuildLog,
) -> ApplicationResult<VariableMap> {
    let resolved = resolve_variables(text, environment, log);
    merge_variables(store, &resolved, log)?;
    Ok(resolved)
}

/// Post-build step that publishes user-defined variables to the global store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalVariablesPublisher {
    #[serde(default, deserialize_with = "deserialize_text")]
    variables_text: Option<String>,
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.filter(|t| !t.is_empty()))
}

impl GlobalVariablesPublisher {
    /// Creates a publisher for `variables_text`; empty text means none.
    #[must_use]
    pub fn new(variables_text: impl Into<String>) -> Self {
        let mut publisher = Self::default();
        publisher.set_variables_text(variables_text);
        publisher
    }

    /// Returns the configured variable text.
    #[must_use]
    pub fn variables_text(&self) -> Option<&str> {
        self.variables_text.as_deref()
    }

    /// Replaces the configured variable text; empty text means none.
    pub fn set_variables_text(&mut self, variables_text: impl Into<String>) {
        let text = variables_text.into();
        self.variables_text = (!text.is_empty()).then_some(text);
    }

    /// Runs the pipeline: parse, resolve, merge into the global store and
    /// persist it.
    ///
    /// Always reports success unless a collaborator fails. A persist failure
    /// can leave the store changed in memory but not saved.
    ///
    /// # Errors
    /// Returns an error if the environment cannot be collected, a variable
    /// is rejected by the store, or the store cannot be persisted.
    pub fn perform<E, A>(
        &self,
        environment: &E,
        store: &mut A,
        log: &dyn BuildLog,
    ) -> ApplicationResult<bool>
    where
        E: EnvironmentProvider + ?Sized,
        A: GlobalStoreAccessor + ?Sized,
    {
        let span = info_span!("publish_global_variables");
        let _guard = span.enter();

        print_log(log, "Evaluating environment variables");
        let current_environment = environment.environment()?;
        let text = self.variables_text().unwrap_or_default();

        resolve_and_merge(text, &current_environment, store.get_or_create(), log)?;
        store.persist()?;

        info!("global store persisted");
        print_log(log, "Updated global environment variables");
        Ok(true)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::significant_drop_tightening
)]
mod tests {
    use super::*;
    use crate::ports::{EnvironmentError, StoreError};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLog {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingLog {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().expect("Lock poisoned").clone()
        }
    }

    impl BuildLog for RecordingLog {
        fn println(&self, line: &str) {
            self.lines.lock().expect("Lock poisoned").push(line.to_string());
        }
    }

    struct FixedEnvironment(VariableMap);

    impl EnvironmentProvider for FixedEnvironment {
        fn environment(&self) -> Result<VariableMap, EnvironmentError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenEnvironment;

    impl EnvironmentProvider for BrokenEnvironment {
        fn environment(&self) -> Result<VariableMap, EnvironmentError> {
            Err(EnvironmentError::Unavailable("no executor".to_string()))
        }
    }

    #[derive(Default)]
    struct MockStore {
        store: Option<GlobalStore>,
        persists: usize,
        fail_persist: bool,
    }

    impl GlobalStoreAccessor for MockStore {
        fn get_or_create(&mut self) -> &mut GlobalStore {
            self.store.get_or_insert_with(GlobalStore::new)
        }

        fn persist(&mut self) -> Result<(), StoreError> {
            if self.fail_persist {
                return Err(StoreError::Serialization("disk full".to_string()));
            }
            self.persists += 1;
            Ok(())
        }
    }

    fn map(entries: &[(&str, &str)]) -> VariableMap {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn store_with(entries: &[(&str, &str)]) -> MockStore {
        MockStore {
            store: Some(GlobalStore::from_variables(map(entries))),
            ..MockStore::default()
        }
    }

    #[test]
    fn test_resolve_variables_on_empty_environment() {
        let log = RecordingLog::default();
        let resolved = resolve_variables(
            "param1=value1\nparam2=$param1/val2\nparam3=$nonexistentVar",
            &VariableMap::new(),
            &log,
        );
        assert_eq!(
            resolved,
            map(&[
                ("param1", "value1"),
                ("param2", "value1/val2"),
                ("param3", "$nonexistentVar"),
            ])
        );
        assert!(log.lines().is_empty());
    }

    #[test]
    fn test_resolve_variables_logs_parse_failure_and_continues() {
        let log = RecordingLog::default();
        let resolved = resolve_variables("a=1\nb=\\u00\nc=3", &VariableMap::new(), &log);
        assert_eq!(resolved, map(&[("a", "1")]));
        assert_eq!(
            log.lines(),
            vec![
                "[GlobalEnvironmentVariableUpdate] Could not parse environment variables"
                    .to_string(),
                "[GlobalEnvironmentVariableUpdate] malformed \\uxxxx encoding on line 2"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_merge_overwrites_and_preserves_unrelated_keys() {
        let log = RecordingLog::default();
        let mut store = GlobalStore::from_variables(map(&[("globalVar", "old"), ("other", "keep")]));
        merge_variables(&mut store, &map(&[("globalVar", "new/val")]), &log).unwrap();

        assert_eq!(store.get("globalVar"), Some("new/val"));
        assert_eq!(store.get("other"), Some("keep"));
        assert_eq!(
            log.lines(),
            vec!["[GlobalEnvironmentVariableUpdate] globalVar=new/val".to_string()]
        );
    }

    #[test]
    fn test_resolve_and_merge_returns_applied_variables() {
        let log = RecordingLog::default();
        let mut store = GlobalStore::new();
        let applied = resolve_and_merge(
            "param1=$globalVar/val1",
            &map(&[("globalVar", "globalValue")]),
            &mut store,
            &log,
        )
        .unwrap();

        assert_eq!(applied, map(&[("param1", "globalValue/val1")]));
        assert_eq!(store.variables(), &applied);
    }

    #[test]
    fn test_perform_creates_store_when_absent() {
        let log = RecordingLog::default();
        let mut accessor = MockStore::default();
        let publisher =
            GlobalVariablesPublisher::new("param1=value1\nparam2=$param1/val2\nparam3=$nonexistentVar");

        let ok = publisher
            .perform(&FixedEnvironment(VariableMap::new()), &mut accessor, &log)
            .unwrap();

        assert!(ok);
        assert_eq!(accessor.persists, 1);
        let store = accessor.store.expect("store created");
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("param2"), Some("value1/val2"));
        assert_eq!(store.get("param3"), Some("$nonexistentVar"));
        assert_eq!(
            log.lines(),
            vec![
                "[GlobalEnvironmentVariableUpdate] Evaluating environment variables".to_string(),
                "[GlobalEnvironmentVariableUpdate] param1=value1".to_string(),
                "[GlobalEnvironmentVariableUpdate] param2=value1/val2".to_string(),
                "[GlobalEnvironmentVariableUpdate] param3=$nonexistentVar".to_string(),
                "[GlobalEnvironmentVariableUpdate] Updated global environment variables"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_perform_with_forward_and_external_references() {
        let log = RecordingLog::default();
        let mut accessor = store_with(&[("globalVar", "globalValue")]);
        let environment = FixedEnvironment(map(&[("globalVar", "globalValue")]));
        let publisher = GlobalVariablesPublisher::new(
            "param1=$globalVar/$param2/val1\nparam2=$param3/val2\nparam3=value3",
        );

        publisher.perform(&environment, &mut accessor, &log).unwrap();

        let store = accessor.store.expect("store kept");
        assert_eq!(
            store.variables(),
            &map(&[
                ("globalVar", "globalValue"),
                ("param1", "globalValue/value3/val2/val1"),
                ("param2", "value3/val2"),
                ("param3", "value3"),
            ])
        );
    }

    #[test]
    fn test_perform_overrides_existing_global_variable() {
        let log = RecordingLog::default();
        let mut accessor = store_with(&[("globalVar", "globalValue")]);
        let environment = FixedEnvironment(map(&[("globalVar", "globalValue")]));
        let publisher = GlobalVariablesPublisher::new("param1=test\nglobalVar=$param1/newVal");

        publisher.perform(&environment, &mut accessor, &log).unwrap();

        let store = accessor.store.expect("store kept");
        assert_eq!(
            store.variables(),
            &map(&[("globalVar", "test/newVal"), ("param1", "test")])
        );
    }

    #[test]
    fn test_perform_without_text_still_persists() {
        let log = RecordingLog::default();
        let mut accessor = store_with(&[("keep", "me")]);
        let publisher = GlobalVariablesPublisher::new("");
        assert_eq!(publisher.variables_text(), None);

        let ok = publisher
            .perform(&FixedEnvironment(VariableMap::new()), &mut accessor, &log)
            .unwrap();

        assert!(ok);
        assert_eq!(accessor.persists, 1);
        assert_eq!(accessor.store.unwrap().variables(), &map(&[("keep", "me")]));
    }

    #[test]
    fn test_perform_propagates_persist_failure() {
        let log = RecordingLog::default();
        let mut accessor = MockStore {
            fail_persist: true,
            ..MockStore::default()
        };
        let publisher = GlobalVariablesPublisher::new("a=1");

        let err = publisher
            .perform(&FixedEnvironment(VariableMap::new()), &mut accessor, &log)
            .unwrap_err();

        assert!(matches!(err, crate::ApplicationError::Store(_)));
        // The merge already happened in memory.
        assert_eq!(accessor.store.unwrap().get("a"), Some("1"));
        assert!(
            !log.lines()
                .iter()
                .any(|l| l.ends_with("Updated global environment variables"))
        );
    }

    #[test]
    fn test_perform_propagates_environment_failure() {
        let log = RecordingLog::default();
        let mut accessor = MockStore::default();
        let publisher = GlobalVariablesPublisher::new("a=1");

        let err = publisher
            .perform(&BrokenEnvironment, &mut accessor, &log)
            .unwrap_err();

        assert!(matches!(err, crate::ApplicationError::Environment(_)));
        assert!(accessor.store.is_none());
        assert_eq!(accessor.persists, 0);
    }

    #[test]
    fn test_publisher_text_accessors() {
        let mut publisher = GlobalVariablesPublisher::new("a=1");
        assert_eq!(publisher.variables_text(), Some("a=1"));

        publisher.set_variables_text("");
        assert_eq!(publisher.variables_text(), None);
    }

    #[test]
    fn test_publisher_deserializes_empty_text_as_none() {
        let publisher: GlobalVariablesPublisher =
            serde_json::from_str(r#"{"variables_text": ""}"#).unwrap();
        assert_eq!(publisher.variables_text(), None);

        let publisher: GlobalVariablesPublisher = serde_json::from_str("{}").unwrap();
        assert_eq!(publisher.variables_text(), None);

        let publisher: GlobalVariablesPublisher =
            serde_json::from_str(r#"{"variables_text": "a=1"}"#).unwrap();
        assert_eq!(publisher.variables_text(), Some("a=1"));
    }
}
