//! Key-value stores that hold adapter settings

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Read-only key-value store the adapter settings come from
pub trait SettingsStore {
    /// Whether the key is present
    fn exists(&self, key: &str) -> bool;

    /// Read a key as an integer
    fn read_int(&self, key: &str) -> Result<i64>;
}

/// In-memory settings store
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: HashMap<String, i64>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: i64) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: i64) {
        self.values.insert(key.into(), value);
    }
}

impl SettingsStore for MemorySettingsStore {
    fn exists(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn read_int(&self, key: &str) -> Result<i64> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()).into())
    }
}

/// A raw value as written in the settings file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Integer(i64),
    Boolean(bool),
    Other(serde_json::Value),
}

/// Settings store backed by a flat TOML or YAML file
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    values: BTreeMap<String, StoredValue>,
}

impl FileSettingsStore {
    /// Open a settings file. A missing file yields an empty store; any other
    /// failure to reach it is an error.
    pub fn open(path: &Path) -> Result<Self> {
        match std::fs::metadata(path) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "settings file missing, using empty store");
                return Ok(Self {
                    values: BTreeMap::new(),
                });
            }
            Err(e) => return Err(ConfigError::Io(e).into()),
        }

        let is_yaml = path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml");
        info!(
            path = %path.display(),
            format = if is_yaml { "YAML" } else { "TOML" },
            "loading settings"
        );

        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let values = if content.trim().is_empty() {
            BTreeMap::new()
        } else if is_yaml {
            serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
        } else {
            toml::from_str(&content).map_err(ConfigError::TomlError)?
        };

        Ok(Self { values })
    }
}

impl SettingsStore for FileSettingsStore {
    fn exists(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn read_int(&self, key: &str) -> Result<i64> {
        match self.values.get(key) {
            Some(StoredValue::Integer(value)) => Ok(*value),
            Some(StoredValue::Boolean(value)) => Ok(i64::from(*value)),
            Some(StoredValue::Other(value)) => Err(ConfigError::NotAnInteger {
                key: key.to_string(),
                found: value.to_string(),
            }
            .into()),
            None => Err(ConfigError::MissingKey(key.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let store = MemorySettingsStore::new().with("Verbosity", 2);
        assert!(store.exists("Verbosity"));
        assert!(!store.exists("ShadowCopy"));
        assert_eq!(store.read_int("Verbosity").unwrap(), 2);
        assert!(store.read_int("ShadowCopy").is_err());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileSettingsStore::open(&temp.path().join("adapter.toml")).unwrap();
        assert!(!store.exists("Verbosity"));
    }

    #[test]
    fn test_toml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("adapter.toml");
        std::fs::write(&path, "ShadowCopy = 1\nVerbosity = 3\nUseVsKeepEngineRunning = true\n")
            .unwrap();

        let store = FileSettingsStore::open(&path).unwrap();
        assert_eq!(store.read_int("ShadowCopy").unwrap(), 1);
        assert_eq!(store.read_int("Verbosity").unwrap(), 3);
        assert_eq!(store.read_int("UseVsKeepEngineRunning").unwrap(), 1);
    }

    #[test]
    fn test_yaml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("adapter.yaml");
        std::fs::write(&path, "ShadowCopy: 0\nVerbosity: 1\n").unwrap();

        let store = FileSettingsStore::open(&path).unwrap();
        assert_eq!(store.read_int("ShadowCopy").unwrap(), 0);
        assert_eq!(store.read_int("Verbosity").unwrap(), 1);
    }

    #[test]
    fn test_non_integer_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("adapter.toml");
        std::fs::write(&path, "Verbosity = \"loud\"\n").unwrap();

        let store = FileSettingsStore::open(&path).unwrap();
        assert!(store.exists("Verbosity"));
        assert!(store.read_int("Verbosity").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreachable_location_is_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let err = FileSettingsStore::open(&blocker.join("adapter.toml")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::ShimError::Config(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("adapter.toml");
        std::fs::write(&path, "Verbosity = = 1").unwrap();

        assert!(FileSettingsStore::open(&path).is_err());
    }
}
