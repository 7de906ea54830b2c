//! CLI commands

mod init;
mod package;
mod settings;

pub use init::InitCommand;
pub use package::PackageCommand;
pub use settings::SettingsCommand;
