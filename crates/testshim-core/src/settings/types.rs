//! Adapter settings

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};

use super::defaults::{
    default_settings_path, KEY_SHADOW_COPY, KEY_USE_VS_KEEP_ENGINE_RUNNING, KEY_VERBOSITY,
};
use super::store::{FileSettingsStore, SettingsStore};

/// Settings the adapter reads once at construction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdapterSettings {
    /// Let the host keep the test engine running between sessions
    pub use_vs_keep_engine_running: bool,

    /// Shadow copy test assemblies before loading
    pub shadow_copy: bool,

    /// Logger verbosity
    pub verbosity: u32,

    /// Why the store could not be read, if it could not
    pub failure: Option<String>,
}

impl AdapterSettings {
    /// Read settings from a store.
    ///
    /// Never fails: a store error resets every value to its default and is
    /// kept in `failure` so it can be reported once a sink is bound.
    pub fn read(store: &dyn SettingsStore) -> Self {
        match Self::try_read(store) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "failed to read adapter settings, using defaults");
                Self::failed(e.to_string())
            }
        }
    }

    /// Read settings from a store, propagating the first error
    pub fn try_read(store: &dyn SettingsStore) -> Result<Self> {
        let use_vs_keep_engine_running = read_flag(store, KEY_USE_VS_KEEP_ENGINE_RUNNING)?;
        let shadow_copy = read_flag(store, KEY_SHADOW_COPY)?;
        let verbosity = if store.exists(KEY_VERBOSITY) {
            let raw = store.read_int(KEY_VERBOSITY)?;
            u32::try_from(raw).map_err(|_| ConfigError::InvalidValue {
                field: KEY_VERBOSITY.to_string(),
                message: format!("must be a non-negative integer, got {}", raw),
            })?
        } else {
            0
        };

        debug!(
            use_vs_keep_engine_running,
            shadow_copy, verbosity, "adapter settings read"
        );
        Ok(Self {
            use_vs_keep_engine_running,
            shadow_copy,
            verbosity,
            failure: None,
        })
    }

    /// Read settings from a file
    pub fn load_from(path: &Path) -> Self {
        match FileSettingsStore::open(path) {
            Ok(store) => Self::read(&store),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to open adapter settings");
                Self::failed(e.to_string())
            }
        }
    }

    /// Read settings from the default location
    pub fn load_default() -> Self {
        match default_settings_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no settings location available, using defaults");
                Self::default()
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    fn failed(message: String) -> Self {
        Self {
            failure: Some(message),
            ..Self::default()
        }
    }
}

/// A flag is set only when the key exists and holds 1
fn read_flag(store: &dyn SettingsStore, key: &str) -> Result<bool> {
    Ok(store.exists(key) && store.read_int(key)? == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettingsStore;
    use tempfile::TempDir;

    #[test]
    fn test_missing_keys_default() {
        let settings = AdapterSettings::read(&MemorySettingsStore::new());
        assert_eq!(settings, AdapterSettings::default());
        assert!(!settings.is_failure());
    }

    #[test]
    fn test_flags_require_one() {
        let store = MemorySettingsStore::new()
            .with(KEY_SHADOW_COPY, 1)
            .with(KEY_USE_VS_KEEP_ENGINE_RUNNING, 2)
            .with(KEY_VERBOSITY, 4);

        let settings = AdapterSettings::read(&store);
        assert!(settings.shadow_copy);
        assert!(!settings.use_vs_keep_engine_running);
        assert_eq!(settings.verbosity, 4);
    }

    #[test]
    fn test_negative_verbosity_is_failure() {
        let store = MemorySettingsStore::new()
            .with(KEY_SHADOW_COPY, 1)
            .with(KEY_VERBOSITY, -1);

        let settings = AdapterSettings::read(&store);
        assert!(settings.is_failure());
        assert!(!settings.shadow_copy);
        assert_eq!(settings.verbosity, 0);
    }

    #[test]
    fn test_read_error_resets_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("adapter.toml");
        std::fs::write(&path, "ShadowCopy = 1\nVerbosity = [1, 2]\n").unwrap();

        let settings = AdapterSettings::load_from(&path);
        assert!(!settings.shadow_copy);
        assert_eq!(settings.verbosity, 0);
        assert!(settings.failure.unwrap().contains("Verbosity"));
    }

    #[test]
    fn test_unparseable_file_is_failure() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("adapter.yaml");
        std::fs::write(&path, "Verbosity: [1\n").unwrap();

        let settings = AdapterSettings::load_from(&path);
        assert!(settings.is_failure());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreachable_location_is_failure() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let settings = AdapterSettings::load_from(&blocker.join("adapter.toml"));
        assert!(settings.is_failure());
        assert_eq!(settings.verbosity, 0);
    }

    #[test]
    fn test_load_default_honors_env_override() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("adapter.toml");
        std::fs::write(&path, "Verbosity = 3\nShadowCopy = 1\n").unwrap();

        std::env::set_var(crate::settings::SETTINGS_ENV_VAR, &path);
        let settings = AdapterSettings::load_default();
        std::env::remove_var(crate::settings::SETTINGS_ENV_VAR);

        assert_eq!(settings.verbosity, 3);
        assert!(settings.shadow_copy);
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("adapter.toml");
        std::fs::write(&path, "UseVsKeepEngineRunning = 1\nVerbosity = 1\n").unwrap();

        let settings = AdapterSettings::load_from(&path);
        assert!(settings.use_vs_keep_engine_running);
        assert!(!settings.shadow_copy);
        assert_eq!(settings.verbosity, 1);
        assert_eq!(settings.failure, None);
    }
}
