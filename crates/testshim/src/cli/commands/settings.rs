//! Settings command

use clap::Args;
use console::style;
use tracing::info;

use testshim_core::{TestAdapter, ADAPTER_NAME};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Show the adapter settings in effect
#[derive(Debug, Args)]
pub struct SettingsCommand {}

impl SettingsCommand {
    /// Execute the settings command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        info!("executing settings command");
        let path = cli.settings_path();
        let adapter = TestAdapter::with_settings(cli.load_settings());
        let settings = adapter.settings();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "adapter": { "name": ADAPTER_NAME, "version": adapter.version() },
                    "path": path.as_ref().map(|p| p.to_string_lossy().to_string()),
                    "settings": settings,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                println!("{}", output::header("Adapter Settings"));
                println!(
                    "{}",
                    output::key_value("Adapter", &format!("{} {}", ADAPTER_NAME, adapter.version()))
                );
                match &path {
                    Some(p) if p.exists() => println!(
                        "{}",
                        output::key_value("File", &output::path_style().apply_to(p.display()).to_string())
                    ),
                    Some(p) => println!(
                        "{}",
                        output::key_value(
                            "File",
                            &format!("{} ({})", p.display(), style("not found, using defaults").yellow())
                        )
                    ),
                    None => println!("{}", output::key_value("File", "none")),
                }
                println!(
                    "{}",
                    output::key_value(
                        "UseVsKeepEngineRunning",
                        &settings.use_vs_keep_engine_running.to_string()
                    )
                );
                println!(
                    "{}",
                    output::key_value("ShadowCopy", &settings.shadow_copy.to_string())
                );
                println!(
                    "{}",
                    output::key_value("Verbosity", &settings.verbosity.to_string())
                );

                if let Some(failure) = &settings.failure {
                    println!();
                    output::error(&format!("Settings could not be read: {}", failure));
                }
            }
        }

        if settings.is_failure() {
            Ok(exit_codes::CONFIG_ERROR)
        } else {
            Ok(exit_codes::SUCCESS)
        }
    }
}
