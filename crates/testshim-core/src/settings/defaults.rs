//! Default settings values and locations

use std::path::PathBuf;

/// Environment variable that overrides the settings file location
pub const SETTINGS_ENV_VAR: &str = "TESTSHIM_SETTINGS";

/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = "adapter.toml";

/// Key for reusing the host's keep-engine-running option
pub const KEY_USE_VS_KEEP_ENGINE_RUNNING: &str = "UseVsKeepEngineRunning";

/// Key for shadow copying test assemblies
pub const KEY_SHADOW_COPY: &str = "ShadowCopy";

/// Key for the logger verbosity
pub const KEY_VERBOSITY: &str = "Verbosity";

/// Resolve the settings file path.
///
/// `$TESTSHIM_SETTINGS` wins; otherwise `<config dir>/testshim/adapter.toml`.
pub fn default_settings_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(SETTINGS_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    Some(dirs::config_dir()?.join("testshim").join(DEFAULT_SETTINGS_FILE))
}

/// Generate the default settings file contents
pub fn default_settings_toml() -> String {
    DEFAULT_SETTINGS_TEMPLATE.to_string()
}

/// Default settings template
pub const DEFAULT_SETTINGS_TEMPLATE: &str = r#"# testshim adapter settings
# Flags are enabled when set to 1.

# Let the host keep the test engine alive between runs
UseVsKeepEngineRunning = 0

# Shadow copy test assemblies before loading them
ShadowCopy = 0

# 0 = one-line error summaries, 1 or more = full fault details
Verbosity = 0
"#;
