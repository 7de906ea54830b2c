//! Adapter base shared by test discovery and execution
//!
//! A [`TestAdapter`] reads its settings once, owns the [`TestLogger`] built
//! from them, and turns source assemblies into [`TestPackage`]s for the test
//! engine. Engine services live in a caller-owned [`AdapterContext`] rather
//! than in process-wide state.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Result, ShimError};
use crate::logger::{MessageSink, TestLogger};
use crate::package::{TestPackage, SHADOW_COPY_FILES};
use crate::settings::{AdapterSettings, SettingsStore};

/// Name reported in session messages
pub const ADAPTER_NAME: &str = "NUnit VS Adapter";

/// Builds the package the test engine loads for a source
pub trait PackageFactory {
    fn create_test_package(&self, source_assembly: &Path) -> TestPackage;
}

/// A test engine service that must be initialized before tests load
pub trait EngineService: Send + Sync {
    /// Service name
    fn name(&self) -> &str;

    /// Prepare the service for use
    fn initialize(&mut self) -> Result<()>;
}

/// Engine services registered by the caller
#[derive(Default)]
pub struct ServiceRegistry {
    services: Vec<Box<dyn EngineService>>,
    initialized: usize,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_service<S: EngineService + 'static>(&mut self, service: S) {
        self.services.push(Box::new(service));
    }

    /// Initialize every service added since the last call
    pub fn initialize_services(&mut self) -> Result<()> {
        for service in self.services.iter_mut().skip(self.initialized) {
            debug!(service = service.name(), "initializing engine service");
            service.initialize().map_err(|e| ShimError::ServiceInit {
                name: service.name().to_string(),
                reason: e.to_string(),
            })?;
            self.initialized += 1;
        }
        Ok(())
    }

    pub fn names(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.names())
            .field("initialized", &self.initialized)
            .finish()
    }
}

/// Caller-owned state shared by the adapters of one host process
#[derive(Debug, Default)]
pub struct AdapterContext {
    pub services: ServiceRegistry,
}

impl AdapterContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service<S: EngineService + 'static>(mut self, service: S) -> Self {
        self.services.add_service(service);
        self
    }
}

/// Kind of session the host starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Discovery,
    Execution,
}

impl SessionKind {
    /// Description used in session messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovery => "discovering tests",
            Self::Execution => "executing tests",
        }
    }
}

/// Common base for test discovery and execution
#[derive(Debug)]
pub struct TestAdapter {
    settings: AdapterSettings,
    log: TestLogger,
    version: String,
}

impl TestAdapter {
    /// Initialize the context's engine services and read settings from the store
    pub fn new(ctx: &mut AdapterContext, store: &dyn SettingsStore) -> Result<Self> {
        Self::with_context(ctx, AdapterSettings::read(store))
    }

    /// Initialize the context's engine services and use settings already read
    pub fn with_context(ctx: &mut AdapterContext, settings: AdapterSettings) -> Result<Self> {
        ctx.services.initialize_services()?;
        Ok(Self::with_settings(settings))
    }

    /// Build an adapter from settings that were already read
    pub fn with_settings(settings: AdapterSettings) -> Self {
        let log = TestLogger::new(settings.verbosity);
        Self {
            settings,
            log,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    pub fn verbosity(&self) -> u32 {
        self.settings.verbosity
    }

    pub fn shadow_copy(&self) -> bool {
        self.settings.shadow_copy
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn logger(&self) -> &TestLogger {
        &self.log
    }

    /// Bind the host sink and announce the session.
    ///
    /// A settings read failure is reported here, since this is the first
    /// point at which the host can see it.
    pub fn start_session(&self, kind: SessionKind, sink: Arc<dyn MessageSink>) {
        info!(session = kind.as_str(), "session started");
        self.log.initialize(sink);
        if let Some(failure) = &self.settings.failure {
            self.log.send_error(failure);
        }
        self.info(kind.as_str(), "started");
    }

    pub fn finish_session(&self, kind: SessionKind) {
        info!(session = kind.as_str(), "session finished");
        self.info(kind.as_str(), "finished");
    }

    pub fn info(&self, method: &str, function: &str) {
        self.log.send_info(&self.describe(method, function));
    }

    #[allow(unused_variables)]
    pub fn debug(&self, method: &str, function: &str) {
        #[cfg(debug_assertions)]
        self.log.send_debug(&self.describe(method, function));
    }

    fn describe(&self, method: &str, function: &str) -> String {
        format!("{} {} {} is {}", ADAPTER_NAME, self.version, method, function)
    }
}

impl PackageFactory for TestAdapter {
    fn create_test_package(&self, source_assembly: &Path) -> TestPackage {
        let package =
            TestPackage::new(source_assembly).with_setting(SHADOW_COPY_FILES, self.shadow_copy());
        self.log.send_debug(&format!(
            "ShadowCopyFiles is set to :{}",
            package.shadow_copy_files()
        ));
        package
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{CollectingSink, Severity};
    use crate::settings::{MemorySettingsStore, KEY_SHADOW_COPY, KEY_VERBOSITY};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingService {
        name: String,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl EngineService for CountingService {
        fn name(&self) -> &str {
            &self.name
        }

        fn initialize(&mut self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ShimError::other("domain unavailable"));
            }
            Ok(())
        }
    }

    fn service(name: &str, calls: &Arc<AtomicUsize>, fail: bool) -> CountingService {
        CountingService {
            name: name.to_string(),
            calls: calls.clone(),
            fail,
        }
    }

    #[test]
    fn test_services_initialized_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut ctx = AdapterContext::new()
            .with_service(service("DomainManager", &calls, false))
            .with_service(service("ProjectService", &calls, false));

        TestAdapter::new(&mut ctx, &MemorySettingsStore::new()).unwrap();
        TestAdapter::new(&mut ctx, &MemorySettingsStore::new()).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(ctx.services.names(), vec!["DomainManager", "ProjectService"]);
    }

    #[test]
    fn test_service_failure_propagates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut ctx = AdapterContext::new().with_service(service("DomainManager", &calls, true));

        let err = TestAdapter::new(&mut ctx, &MemorySettingsStore::new()).unwrap_err();
        assert!(matches!(err, ShimError::ServiceInit { .. }));
    }

    #[test]
    fn test_logger_uses_configured_verbosity() {
        let store = MemorySettingsStore::new().with(KEY_VERBOSITY, 2);
        let adapter = TestAdapter::new(&mut AdapterContext::new(), &store).unwrap();
        assert_eq!(adapter.verbosity(), 2);
        assert_eq!(adapter.logger().verbosity(), 2);
    }

    #[test]
    fn test_session_messages() {
        let adapter = TestAdapter::with_settings(AdapterSettings::default());
        adapter.info("discovering tests", "ignored before binding");

        let sink = Arc::new(CollectingSink::default());
        adapter.start_session(SessionKind::Execution, sink.clone());
        adapter.finish_session(SessionKind::Execution);

        let version = env!("CARGO_PKG_VERSION");
        assert_eq!(adapter.version(), version);
        assert_eq!(
            sink.messages(),
            vec![
                (
                    Severity::Informational,
                    format!("NUnit VS Adapter {} executing tests is started", version)
                ),
                (
                    Severity::Informational,
                    format!("NUnit VS Adapter {} executing tests is finished", version)
                ),
            ]
        );
    }

    #[test]
    fn test_settings_failure_reported_at_session_start() {
        let store = MemorySettingsStore::new().with(KEY_VERBOSITY, -5);
        let adapter = TestAdapter::new(&mut AdapterContext::new(), &store).unwrap();
        assert_eq!(adapter.verbosity(), 0);

        let sink = Arc::new(CollectingSink::default());
        adapter.start_session(SessionKind::Discovery, sink.clone());

        let messages = sink.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].0, Severity::Error);
        assert!(messages[0].1.contains("Verbosity"));
    }

    #[test]
    fn test_create_test_package_carries_shadow_copy() {
        let store = MemorySettingsStore::new().with(KEY_SHADOW_COPY, 1);
        let adapter = TestAdapter::new(&mut AdapterContext::new(), &store).unwrap();
        let sink = Arc::new(CollectingSink::default());
        adapter.logger().initialize(sink.clone());

        let package = adapter.create_test_package(Path::new("bin/Tests.dll"));
        assert!(package.shadow_copy_files());
        assert_eq!(package.name, "Tests.dll");

        if cfg!(debug_assertions) {
            assert_eq!(
                sink.messages(),
                vec![(
                    Severity::Informational,
                    "ShadowCopyFiles is set to :true".to_string()
                )]
            );
        } else {
            assert!(sink.is_empty());
        }
    }

    #[test]
    fn test_shadow_copy_off_by_default() {
        let adapter = TestAdapter::with_settings(AdapterSettings::default());
        let package = adapter.create_test_package(Path::new("Tests.dll"));
        assert!(!package.shadow_copy_files());
        assert_eq!(package.get(SHADOW_COPY_FILES), Some(&serde_json::Value::Bool(false)));
    }
}
