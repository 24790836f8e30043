//! Layered settings: defaults, optional settings file, `GLOBENV_*`
//! environment variables. Command line flags are applied on top by `main`.

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Store file used when nothing else is configured.
pub const DEFAULT_STORE_PATH: &str = "globenv.json";

/// Prefix of environment variables read as settings.
const ENV_PREFIX: &str = "GLOBENV";

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Path of the global configuration document.
    pub store: PathBuf,

    /// Variable text to publish.
    #[serde(default)]
    pub variables_text: Option<String>,

    /// File to read the variable text from when no text is given inline.
    #[serde(default)]
    pub variables_file: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from defaults, `config_file` (if any) and the
    /// environment, later sources overriding earlier ones.
    ///
    /// # Errors
    /// Returns an error if the settings file is missing or malformed.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().set_default("store", DEFAULT_STORE_PATH)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    /// Uses `text` as the variable text, dropping any configured file.
    pub fn set_variables_text(&mut self, text: String) {
        self.variables_text = Some(text);
        self.variables_file = None;
    }

    /// Reads the variable text from `path`, dropping any configured text.
    pub fn set_variables_file(&mut self, path: PathBuf) {
        self.variables_file = Some(path);
        self.variables_text = None;
    }

    /// Returns the variable text, reading the variables file if needed.
    ///
    /// # Errors
    /// Returns an error if the variables file cannot be read.
    pub fn read_variables_text(&self) -> std::io::Result<Option<String>> {
        if let Some(text) = &self.variables_text {
            return Ok(Some(text.clone()));
        }
        self.variables_file
            .as_deref()
            .map(fs::read_to_string)
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("globenv.toml");
        fs::write(
            &path,
            "store = \"/var/lib/globenv/store.json\"\nvariables_text = \"a=1\"\n",
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.store, PathBuf::from("/var/lib/globenv/store.json"));
        assert_eq!(settings.variables_text.as_deref(), Some("a=1"));
        assert_eq!(settings.variables_file, None);
    }

    #[test]
    fn test_missing_settings_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_cli_overrides_replace_each_other() {
        let mut settings = Settings {
            store: PathBuf::from(DEFAULT_STORE_PATH),
            variables_text: Some("a=1".to_string()),
            variables_file: None,
        };

        settings.set_variables_file(PathBuf::from("vars.properties"));
        assert_eq!(settings.variables_text, None);

        settings.set_variables_text("b=2".to_string());
        assert_eq!(settings.variables_file, None);
        assert_eq!(settings.read_variables_text().unwrap().as_deref(), Some("b=2"));
    }

    #[test]
    fn test_read_variables_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vars.properties");
        fs::write(&path, "param1=value1\n").unwrap();

        let settings = Settings {
            store: PathBuf::from(DEFAULT_STORE_PATH),
            variables_text: None,
            variables_file: Some(path),
        };
        assert_eq!(
            settings.read_variables_text().unwrap().as_deref(),
            Some("param1=value1\n")
        );
    }

    #[test]
    fn test_no_variable_source() {
        let settings = Settings {
            store: PathBuf::from(DEFAULT_STORE_PATH),
            variables_text: None,
            variables_file: None,
        };
        assert_eq!(settings.read_variables_text().unwrap(), None);
    }
}
