//! Output formatting utilities

use console::{style, Style};

use testshim_core::{MessageSink, Severity};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    eprintln!("{} {}", style("→").blue(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// Sink that prints adapter messages to stderr
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl MessageSink for ConsoleSink {
    fn send_message(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => error(message),
            Severity::Warning => warning(message),
            Severity::Informational => info(message),
            Severity::Debug => eprintln!("{} {}", style("·").dim(), style(message).dim()),
        }
    }
}
