//! Exit codes for the CLI

/// Success
pub const SUCCESS: i32 = 0;

/// Settings could not be read
pub const CONFIG_ERROR: i32 = 2;
