//! testshim Core - Core library for the test-platform adapter
//!
//! This crate provides the message routing, adapter settings, and test
//! package types shared by the discovery and execution entry points of a
//! test-platform host.

pub mod adapter;
pub mod error;
pub mod logger;
pub mod package;
pub mod settings;

pub use adapter::{
    AdapterContext, EngineService, PackageFactory, ServiceRegistry, SessionKind, TestAdapter,
    ADAPTER_NAME,
};
pub use error::{ConfigError, Result, ShimError};
pub use logger::{CollectingSink, Fault, MessageSink, Severity, TestLogger, TracingSink};
pub use package::TestPackage;
pub use settings::{AdapterSettings, FileSettingsStore, MemorySettingsStore, SettingsStore};
