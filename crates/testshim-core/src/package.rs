//! Test package handed to the test engine

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Setting that tells the engine whether to shadow copy assemblies
pub const SHADOW_COPY_FILES: &str = "ShadowCopyFiles";

/// The assemblies to load plus the engine settings that apply to them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPackage {
    /// Short name (file name of the source)
    pub name: String,

    /// Full path of the source
    pub full_name: PathBuf,

    /// Assemblies in the package
    pub assemblies: Vec<PathBuf>,

    /// Engine settings
    #[serde(default)]
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl TestPackage {
    /// Create a package for a single source assembly
    pub fn new(source: impl AsRef<Path>) -> Self {
        let source = source.as_ref();
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| source.display().to_string());

        Self {
            name,
            full_name: source.to_path_buf(),
            assemblies: vec![source.to_path_buf()],
            settings: BTreeMap::new(),
        }
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.settings.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings.get(key)
    }

    /// Whether assemblies will be shadow copied; unset means no
    pub fn shadow_copy_files(&self) -> bool {
        self.get(SHADOW_COPY_FILES)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
