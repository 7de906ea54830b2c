//! Init command

use std::path::PathBuf;

use clap::Args;
use console::style;
use dialoguer::Confirm;
use tracing::info;

use testshim_core::settings::default_settings_toml;

use crate::cli::{output, Cli};
use crate::exit_codes;

/// Write a default settings file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing settings
    #[arg(short, long)]
    pub force: bool,

    /// Use defaults without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output file path (defaults to the settings location)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        info!(force = self.force, yes = self.yes, "executing init command");
        let path = self
            .output
            .clone()
            .or_else(|| cli.settings_path())
            .ok_or_else(|| anyhow::anyhow!("No settings location available; pass --output"))?;

        if path.exists() && !self.force {
            if self.yes {
                anyhow::bail!(
                    "Settings file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Settings file already exists at {}. Overwrite?",
                    path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                println!("{}", style("Aborted.").yellow());
                return Ok(exit_codes::SUCCESS);
            }
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&path, default_settings_toml())?;
        info!(path = %path.display(), "settings file written");

        output::success(&format!(
            "Wrote settings to {}",
            output::path_style().apply_to(path.display())
        ));
        Ok(exit_codes::SUCCESS)
    }
}
