//! Package command

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use tracing::{debug, info};

use testshim_core::{
    AdapterContext, Fault, MessageSink, PackageFactory, SessionKind, TestAdapter, TestPackage,
    TracingSink,
};

use crate::cli::output::{self, ConsoleSink};
use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Extensions the test engine can load
const SUPPORTED_EXTENSIONS: &[&str] = &["dll", "exe"];

/// Build test packages for source assemblies
#[derive(Debug, Args)]
pub struct PackageCommand {
    /// Source assemblies
    #[arg(required = true)]
    pub sources: Vec<PathBuf>,
}

impl PackageCommand {
    /// Execute the package command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        info!(count = self.sources.len(), "executing package command");
        let mut ctx = AdapterContext::new();
        let adapter = TestAdapter::with_context(&mut ctx, cli.load_settings())?;

        // In JSON mode adapter messages go to the log, not the terminal
        let sink: Arc<dyn MessageSink> = match cli.format {
            OutputFormat::Json => Arc::new(TracingSink),
            OutputFormat::Text => Arc::new(ConsoleSink),
        };
        adapter.start_session(SessionKind::Discovery, sink);
        adapter.debug(SessionKind::Discovery.as_str(), "building packages");

        let packages: Vec<TestPackage> = self
            .sources
            .iter()
            .filter(|source| check_source(&adapter, source))
            .map(|source| adapter.create_test_package(source))
            .collect();

        adapter.finish_session(SessionKind::Discovery);

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&packages)?);
            }
            OutputFormat::Text => {
                for package in &packages {
                    println!("{}", output::header(&package.name));
                    println!(
                        "{}",
                        output::key_value(
                            "Path",
                            &output::path_style()
                                .apply_to(package.full_name.display())
                                .to_string()
                        )
                    );
                    for (key, value) in &package.settings {
                        println!("{}", output::key_value(key, &value.to_string()));
                    }
                }
            }
        }

        Ok(exit_codes::SUCCESS)
    }
}

/// Warn about and skip sources the engine cannot load
fn check_source(adapter: &TestAdapter, source: &Path) -> bool {
    let source_name = source.display().to_string();
    if let Err(e) = std::fs::metadata(source) {
        debug!(source = %source_name, error = %e, "source not accessible");
        adapter.logger().send_warning_with_fault(
            &format!("Cannot access {}", source_name),
            &Fault::from_error(&e),
        );
        return false;
    }

    let supported = source
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
    if !supported {
        adapter.logger().assembly_not_supported_warning(&source_name);
    }
    supported
}
