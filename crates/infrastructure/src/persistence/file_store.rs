//! File-based global configuration store.
//!
//! The host configuration is kept as one JSON document. Persisting writes a
//! temporary file next to it and renames it into place.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use globenv_application::ports::{GlobalStoreAccessor, StoreError};
use globenv_domain::{GlobalConfiguration, GlobalStore};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Global configuration stored in a JSON file:
/// ```json
/// {
///   "schema_version": 1,
///   "environment_variables": {
///     "JAVA_HOME": "/opt/jdk",
///     "RELEASE": "1.4.0"
///   }
/// }
/// ```
///
/// Other top-level sections are kept as they are.
#[derive(Debug, Clone)]
pub struct FileGlobalConfiguration {
    path: PathBuf,
    configuration: GlobalConfiguration,
}

impl FileGlobalConfiguration {
    /// Loads the configuration at `path`.
    ///
    /// A missing file is an empty configuration; nothing is written until
    /// [`GlobalStoreAccessor::persist`] is called.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// uses an unsupported schema version.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let configuration = match fs::read(&path) {
            Ok(content) => {
                let configuration = Self::from_document(&content)?;
                debug!(path = %path.display(), "loaded global configuration");
                configuration
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no global configuration yet");
                GlobalConfiguration::new()
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        Ok(Self {
            path,
            configuration,
        })
    }

    /// Decodes and validates a configuration document.
    ///
    /// # Errors
    /// Returns [`StoreError::Serialization`] if `content` is not a
    /// configuration document, or [`StoreError::Invalid`] if it fails
    /// validation.
    pub fn from_document(content: &[u8]) -> Result<GlobalConfiguration, StoreError> {
        let configuration: GlobalConfiguration =
            serde_json::from_slice(content).map_err(|e| {
                StoreError::Serialization(format!("invalid configuration document: {e}"))
            })?;
        configuration.validate()?;
        Ok(configuration)
    }

    /// Encodes `configuration` the way it is written to disk: two-space
    /// indentation, sorted variable names and a trailing newline.
    ///
    /// # Errors
    /// Returns [`StoreError::Serialization`] if encoding fails.
    pub fn to_document(configuration: &GlobalConfiguration) -> Result<Vec<u8>, StoreError> {
        let mut content = serde_json::to_vec_pretty(configuration).map_err(|e| {
            StoreError::Serialization(format!("cannot encode configuration: {e}"))
        })?;
        content.push(b'\n');
        Ok(content)
    }

    /// Returns the configuration as currently held in memory.
    #[must_use]
    pub const fn configuration(&self) -> &GlobalConfiguration {
        &self.configuration
    }

    /// Returns the directory temporary files are created in.
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl GlobalStoreAccessor for FileGlobalConfiguration {
    fn get_or_create(&mut self) -> &mut GlobalStore {
        self.configuration.store_or_create()
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let content = Self::to_document(&self.configuration)?;

        let dir = self.parent_dir();
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&content)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        info!(path = %self.path.display(), "persisted global configuration");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("globenv.json");

        let config = FileGlobalConfiguration::open(&path).unwrap();
        assert!(config.configuration().store().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_persist_then_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("globenv.json");

        let mut config = FileGlobalConfiguration::open(&path).unwrap();
        config.get_or_create().set("param1", "value1").unwrap();
        config.persist().unwrap();

        let reopened = FileGlobalConfiguration::open(&path).unwrap();
        let store = reopened.configuration().store().expect("store persisted");
        assert_eq!(store.get("param1"), Some("value1"));
    }

    #[test]
    fn test_persist_keeps_unknown_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("globenv.json");
        fs::write(
            &path,
            r#"{"schema_version": 1, "environment_variables": {"a": "1"}, "views": ["all"]}"#,
        )
        .unwrap();

        let mut config = FileGlobalConfiguration::open(&path).unwrap();
        config.get_or_create().set("b", "2").unwrap();
        config.persist().unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["views"][0], "all");
        assert_eq!(written["environment_variables"]["a"], "1");
        assert_eq!(written["environment_variables"]["b"], "2");
    }

    #[test]
    fn test_open_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("globenv.json");
        fs::write(&path, "not json").unwrap();

        let err = FileGlobalConfiguration::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_open_rejects_newer_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("globenv.json");
        fs::write(&path, r#"{"schema_version": 99}"#).unwrap();

        let err = FileGlobalConfiguration::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn test_document_sorts_names_and_ends_with_newline() {
        let mut store = GlobalStore::new();
        store.set("zebra", "1").unwrap();
        store.set("apple", "2").unwrap();
        store.set("mango", "3").unwrap();

        let configuration = GlobalConfiguration::with_store(store);
        let content = FileGlobalConfiguration::to_document(&configuration).unwrap();
        let json = String::from_utf8(content).unwrap();

        let apple = json.find("apple").unwrap();
        let mango = json.find("mango").unwrap();
        let zebra = json.find("zebra").unwrap();
        assert!(apple < mango && mango < zebra);
        assert!(json.contains("\n  \"environment_variables\""));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_document_rejects_empty_variable_name() {
        let err = FileGlobalConfiguration::from_document(
            br#"{"schema_version": 1, "environment_variables": {"": "x"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn test_parent_dir_of_bare_file_name() {
        let config = FileGlobalConfiguration {
            path: PathBuf::from("globenv.json"),
            configuration: GlobalConfiguration::new(),
        };
        assert_eq!(config.parent_dir(), Path::new("."));
    }
}
