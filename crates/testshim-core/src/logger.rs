//! Message routing from the adapter to the host
//!
//! The host only hands over its message sink when a discovery or execution
//! session starts, so `TestLogger` uses two-phase construction: it is created
//! with a verbosity when the adapter is built and bound to a sink later.
//! Until [`TestLogger::initialize`] is called every message is dropped.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Severity of a message sent to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Informational,
    Debug,
}

impl Severity {
    /// Get severity as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Informational => "informational",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver of adapter messages, supplied by the host
pub trait MessageSink: Send + Sync {
    /// Deliver a message
    fn send_message(&self, severity: Severity, message: &str);
}

/// An error attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Classification tag, usually the error's type name
    pub kind: String,
    /// Full description, including any causes
    pub detail: String,
}

impl Fault {
    pub fn new(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: detail.into(),
        }
    }

    /// Build a fault from an error value, walking its `source()` chain
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + 'static,
    {
        let kind = std::any::type_name::<E>();
        let mut detail = format!("{}: {}", kind, err);
        let mut source = err.source();
        while let Some(cause) = source {
            detail.push_str("\n  caused by: ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(kind, detail)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

/// Logger that formats adapter diagnostics and forwards them to the host sink
pub struct TestLogger {
    verbosity: u32,
    sink: RwLock<Option<Arc<dyn MessageSink>>>,
}

impl TestLogger {
    /// Create an unbound logger with the given verbosity
    pub fn new(verbosity: u32) -> Self {
        Self {
            verbosity,
            sink: RwLock::new(None),
        }
    }

    /// Bind the host sink. A later call replaces the earlier sink.
    pub fn initialize(&self, sink: Arc<dyn MessageSink>) {
        let mut slot = self.sink.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(sink);
    }

    pub fn is_initialized(&self) -> bool {
        self.current_sink().is_some()
    }

    pub fn verbosity(&self) -> u32 {
        self.verbosity
    }

    pub fn assembly_not_supported_warning(&self, source_assembly: &str) {
        self.send_warning(&format!("Assembly not supported: {}", source_assembly));
    }

    pub fn dependent_assembly_not_found_warning(
        &self,
        dependent_assembly: &str,
        source_assembly: &str,
    ) {
        self.send_warning(&format!(
            "Dependent Assembly {} of {} not found. Can be ignored if not a NUnit project.",
            dependent_assembly, source_assembly
        ));
    }

    pub fn unsupported_framework_warning(&self, assembly: &str) {
        self.send_warning(&format!(
            "Attempt to load assembly with unsupported test framework in  {}",
            assembly
        ));
    }

    pub fn loading_assembly_failed_warning(&self, dependent_assembly: &str, source_assembly: &str) {
        self.send_warning(&format!(
            "Assembly {} loaded through {} failed. Assembly is ignored. Correct deployment of dependencies if this is an error.",
            dependent_assembly, source_assembly
        ));
    }

    pub fn load_error(&self, source_assembly: &str) {
        self.send_error(&format!("NUnit failed to load {}", source_assembly));
    }

    pub fn send_error(&self, message: &str) {
        self.send_message(Severity::Error, message);
    }

    /// Send an error with an attached fault.
    ///
    /// At verbosity 0 a single line carrying the fault's kind is sent. Above
    /// that the message and the full fault detail go out as two errors.
    pub fn send_error_with_fault(&self, message: &str, fault: &Fault) {
        match self.verbosity {
            0 => self.send_error(&summarize(message, fault)),
            _ => {
                self.send_error(message);
                self.send_error(&fault.detail);
            }
        }
    }

    pub fn send_warning(&self, message: &str) {
        self.send_message(Severity::Warning, message);
    }

    /// Send a warning with an attached fault.
    ///
    /// Tiered like [`send_error_with_fault`](Self::send_error_with_fault).
    /// With `legacy-duplicate-warning` enabled the plain message is sent
    /// once more at the end, whatever the verbosity.
    pub fn send_warning_with_fault(&self, message: &str, fault: &Fault) {
        match self.verbosity {
            0 => self.send_warning(&summarize(message, fault)),
            _ => {
                self.send_warning(message);
                self.send_warning(&fault.detail);
            }
        }

        #[cfg(feature = "legacy-duplicate-warning")]
        self.send_warning(message);
    }

    pub fn send_info(&self, message: &str) {
        self.send_message(Severity::Informational, message);
    }

    /// Send a debug message. Only debug builds deliver it.
    #[allow(unused_variables)]
    pub fn send_debug(&self, message: &str) {
        #[cfg(debug_assertions)]
        self.send_message(Severity::Informational, message);
    }

    /// Forward a message to the bound sink, or drop it if none is bound
    pub fn send_message(&self, severity: Severity, message: &str) {
        if let Some(sink) = self.current_sink() {
            sink.send_message(severity, message);
        }
    }

    fn current_sink(&self) -> Option<Arc<dyn MessageSink>> {
        self.sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for TestLogger {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for TestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestLogger")
            .field("verbosity", &self.verbosity)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl MessageSink for TestLogger {
    fn send_message(&self, severity: Severity, message: &str) {
        TestLogger::send_message(self, severity, message);
    }
}

fn summarize(message: &str, fault: &Fault) -> String {
    format!("Exception {}, {}", fault.kind, message)
}

/// Sink that emits messages as tracing events
#[derive(Debug, Default)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn send_message(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => tracing::error!("{}", message),
            Severity::Warning => tracing::warn!("{}", message),
            Severity::Informational => tracing::info!("{}", message),
            Severity::Debug => tracing::debug!("{}", message),
        }
    }
}

/// Sink that records messages for later inspection
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl CollectingSink {
    /// Get all recorded messages in delivery order
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageSink for CollectingSink {
    fn send_message(&self, severity: Severity, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((severity, message.to_string()));
    }
}
