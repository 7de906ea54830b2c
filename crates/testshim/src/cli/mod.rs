//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use testshim_core::settings::default_settings_path;
use testshim_core::AdapterSettings;

use commands::{InitCommand, PackageCommand, SettingsCommand};

/// testshim - Test-platform adapter shim
#[derive(Debug, Parser)]
#[command(name = "testshim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Adapter settings file (defaults to $TESTSHIM_SETTINGS or the user config dir)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the adapter settings in effect
    Settings(SettingsCommand),

    /// Write a default settings file
    Init(InitCommand),

    /// Build test packages for source assemblies
    Package(PackageCommand),
}

impl Cli {
    /// Execute the CLI command, returning the process exit code
    pub fn execute(self) -> anyhow::Result<i32> {
        match self.command {
            Commands::Settings(ref cmd) => cmd.execute(&self),
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Package(ref cmd) => cmd.execute(&self),
        }
    }

    /// Settings file this invocation uses
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.settings.clone().or_else(default_settings_path)
    }

    pub fn load_settings(&self) -> AdapterSettings {
        match &self.settings {
            Some(path) => AdapterSettings::load_from(path),
            None => AdapterSettings::load_default(),
        }
    }
}
