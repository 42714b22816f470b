//! Boot orchestration
//!
//! Ties the configuration pipeline to the registry and the lifecycle
//! coordinator:
//!
//! 1. Load the boot document and resolve env and flag overrides
//! 2. Register the built-in [`AppInfoEntry`] from the `app` section
//! 3. Hand each present section to its registrar, in registration order
//! 4. `bootstrap()` entries in registration order
//! 5. `wait_for_shutdown()`: run shutdown hooks, then interrupt entries in
//!    reverse order

use super::app_info::AppInfoEntry;
use super::lifecycle::{LifecycleCoordinator, ShutdownReason};
use super::registry::{Entry, Registry};
use crate::config::decode::find_section;
use crate::config::env::DEFAULT_ENV_PREFIX;
use crate::config::loader::{
    load_document, parse_document, resolve_document, DocumentFormat, ResolveOptions,
    ResolvedDocument, DEFAULT_BOOT_PATH,
};
use crate::config::BootConfig;
use crate::domain::errors::BootError;
use crate::domain::node::Node;
use crate::domain::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;

/// Builds entries from one section of the resolved boot document
pub type Registrar = Box<dyn Fn(&Node) -> Result<Vec<Arc<dyn Entry>>> + Send + Sync>;

enum DocumentSource {
    Path(PathBuf),
    Raw(String, DocumentFormat),
}

/// Configures a [`Boot`]
pub struct BootBuilder {
    source: DocumentSource,
    env_prefix: String,
    overrides: Option<String>,
    registrars: Vec<(String, Registrar)>,
    registry: Option<Arc<Registry>>,
    coordinator: Option<Arc<LifecycleCoordinator>>,
}

impl BootBuilder {
    fn new() -> Self {
        Self {
            source: DocumentSource::Path(PathBuf::from(DEFAULT_BOOT_PATH)),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            overrides: None,
            registrars: Vec::new(),
            registry: None,
            coordinator: None,
        }
    }

    /// Reads the boot document from `path`
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = DocumentSource::Path(path.into());
        self
    }

    /// Uses an in-memory document instead of a file
    pub fn raw_document(mut self, contents: impl Into<String>, format: DocumentFormat) -> Self {
        self.source = DocumentSource::Raw(contents.into(), format);
        self
    }

    /// Environment prefix for overrides (`RK` by default)
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Flag override string in the `path=value,...` grammar
    pub fn overrides(mut self, overrides: Option<String>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Registers a section handler; it runs only if the section is present
    pub fn registrar<F>(mut self, section: impl Into<String>, registrar: F) -> Self
    where
        F: Fn(&Node) -> Result<Vec<Arc<dyn Entry>>> + Send + Sync + 'static,
    {
        self.registrars.push((section.into(), Box::new(registrar)));
        self
    }

    /// Shares an existing registry instead of creating one
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Shares an existing coordinator instead of creating one
    pub fn coordinator(mut self, coordinator: Arc<LifecycleCoordinator>) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    /// Resolves configuration and registers every entry
    ///
    /// # Errors
    ///
    /// Fails if the document can't be loaded, the flag overrides are
    /// malformed, the core sections don't decode or validate, or a registrar
    /// fails. Callers are expected to stop the process on error.
    pub fn build(self) -> Result<Boot> {
        let document = match &self.source {
            DocumentSource::Path(path) => load_document(path)?,
            DocumentSource::Raw(contents, format) => parse_document(contents, *format)?,
        };

        let options = ResolveOptions {
            env_prefix: self.env_prefix.clone(),
            flag_overrides: self.overrides.clone(),
        };
        let resolved = resolve_document(document, &options)?;
        let config = resolved.boot_config()?;

        let registry = self.registry.unwrap_or_else(|| Arc::new(Registry::new()));
        let coordinator = self
            .coordinator
            .unwrap_or_else(|| Arc::new(LifecycleCoordinator::new()));

        registry.set_service_info(config.app.name.clone(), config.app.version.clone());

        let mut order = Vec::new();
        let app_entry: Arc<dyn Entry> = Arc::new(AppInfoEntry::new(config.app.clone()));
        order.push((app_entry.kind().to_string(), app_entry.name().to_string()));
        registry.add_entry(app_entry);

        for (section, registrar) in &self.registrars {
            let Some(node) = find_section(&resolved.node, section) else {
                tracing::debug!(section = %section, "Section absent, skipping registrar");
                continue;
            };
            let entries = registrar(node)?;
            for entry in entries {
                let key = (entry.kind().to_string(), entry.name().to_string());
                tracing::info!(
                    section = %section,
                    kind = %key.0,
                    name = %key.1,
                    "Registered entry"
                );
                registry.add_entry(entry);
                order.retain(|k| k != &key);
                order.push(key);
            }
        }

        tracing::info!(
            app = %config.app.name,
            version = %config.app.version,
            event_id = %registry.event_id(),
            entries = order.len(),
            "Boot configuration resolved"
        );

        Ok(Boot {
            registry,
            coordinator,
            resolved,
            config,
            order,
            interrupted: OnceCell::new(),
        })
    }
}

/// A resolved boot: registered entries plus the coordinator driving them
pub struct Boot {
    registry: Arc<Registry>,
    coordinator: Arc<LifecycleCoordinator>,
    resolved: ResolvedDocument,
    config: BootConfig,
    order: Vec<(String, String)>,
    interrupted: OnceCell<()>,
}

impl Boot {
    pub fn builder() -> BootBuilder {
        BootBuilder::new()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn coordinator(&self) -> &Arc<LifecycleCoordinator> {
        &self.coordinator
    }

    /// The document after env and flag overrides
    pub fn resolved(&self) -> &ResolvedDocument {
        &self.resolved
    }

    /// Decoded core sections
    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// Every override applied on top of the document, env first
    ///
    /// Env overrides render as `path=value (ENV_KEY)`, flag overrides as
    /// `path=value`.
    pub fn overrides_applied(&self) -> Vec<String> {
        self.resolved
            .env_records
            .iter()
            .map(|r| format!("{}={} ({})", r.path, r.value, r.env_key))
            .chain(self.resolved.flag_assignments.iter().cloned())
            .collect()
    }

    /// `(kind, name)` of every entry, in bootstrap order
    pub fn entry_order(&self) -> &[(String, String)] {
        &self.order
    }

    /// Bootstraps entries in registration order
    ///
    /// Entries removed from the registry since `build()` are skipped.
    ///
    /// # Errors
    ///
    /// Stops at the first entry that fails and returns
    /// [`BootError::Entry`] for it.
    pub async fn bootstrap(&self) -> Result<()> {
        let ctx = self.coordinator.context();
        for (kind, name) in &self.order {
            let Some(entry) = self.registry.get_entry(kind, name) else {
                continue;
            };
            let started = Instant::now();
            crate::log_entry_bootstrap!(kind, name);
            entry.bootstrap(&ctx).await.map_err(|e| {
                crate::log_error_with_context!(&e, "Entry bootstrap failed");
                match e {
                    err @ BootError::Entry { .. } => err,
                    other => BootError::entry(kind.as_str(), name.as_str(), other.to_string()),
                }
            })?;
            tracing::debug!(
                kind = %kind,
                name = %name,
                duration_ms = started.elapsed().as_millis(),
                "Entry bootstrapped"
            );
        }
        Ok(())
    }

    /// Requests shutdown; see [`LifecycleCoordinator::shutdown`]
    pub fn shutdown(&self) -> bool {
        self.coordinator.shutdown()
    }

    /// Waits for a signal or `shutdown()`, runs the shutdown hooks, then
    /// interrupts entries in reverse registration order
    ///
    /// Entries are interrupted once even if several tasks wait.
    pub async fn wait_for_shutdown(&self) -> ShutdownReason {
        let reason = self.coordinator.wait().await;
        self.interrupted
            .get_or_init(|| self.interrupt_entries())
            .await;
        reason
    }

    async fn interrupt_entries(&self) {
        let ctx = self.coordinator.context();
        for (kind, name) in self.order.iter().rev() {
            if let Some(entry) = self.registry.get_entry(kind, name) {
                crate::log_entry_interrupt!(kind, name);
                entry.interrupt(&ctx).await;
            }
        }
    }
}

impl std::fmt::Debug for Boot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Boot")
            .field("app", &self.config.app.name)
            .field("entries", &self.order)
            .field("registry", &self.registry)
            .field("coordinator", &self.coordinator)
            .finish()
    }
}
