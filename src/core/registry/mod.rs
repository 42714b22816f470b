//! Entry registry
//!
//! Stores entries keyed by `(kind, name)` together with embedded resource
//! handles keyed the same way. Every operation takes the same coarse lock:
//! the registry is only touched during startup and shutdown, never on a hot
//! path.

pub mod entry;
pub mod fs;

pub use entry::{downcast_entry, Entry};
pub use fs::{EmbeddedFs, StaticFs};

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

type KindMap<T> = HashMap<String, HashMap<String, T>>;

#[derive(Default)]
struct RegistryState {
    entries: KindMap<Arc<dyn Entry>>,
    fs: KindMap<Arc<dyn EmbeddedFs>>,
    service_name: String,
    service_version: String,
}

/// Process registry of entries and their embedded resources
///
/// Construct one per process and share it as `Arc<Registry>`.
///
/// # Examples
///
/// ```
/// use rkboot::core::registry::Registry;
/// use rkboot::core::app_info::{AppInfoEntry, APP_INFO_ENTRY_KIND};
/// use rkboot::config::AppInfoConfig;
/// use std::sync::Arc;
///
/// let registry = Registry::new();
/// let entry = Arc::new(AppInfoEntry::new(AppInfoConfig::default()));
/// registry.add_entry(entry);
///
/// assert!(registry.get_entry(APP_INFO_ENTRY_KIND, "rkboot").is_some());
/// registry.remove_entry(APP_INFO_ENTRY_KIND, "rkboot");
/// assert!(registry.get_entry(APP_INFO_ENTRY_KIND, "rkboot").is_none());
/// ```
pub struct Registry {
    state: Mutex<RegistryState>,
    start_time: DateTime<Utc>,
    event_id: Uuid,
}

impl Registry {
    /// Creates an empty registry, stamping the start time and event id
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            start_time: Utc::now(),
            event_id: Uuid::new_v4(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // A panic while holding the lock can't leave the maps half-updated,
        // so a poisoned lock is still safe to use.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Inserts an entry at `(kind, name)`, replacing any previous one
    pub fn add_entry(&self, entry: Arc<dyn Entry>) {
        let kind = entry.kind().to_string();
        let name = entry.name().to_string();
        let mut state = self.lock();
        let by_name = state.entries.entry(kind.clone()).or_default();

        if entry.is_default()
            && by_name
                .iter()
                .any(|(other, e)| other != &name && e.is_default())
        {
            tracing::warn!(
                kind = %kind,
                name = %name,
                "Multiple default entries registered for kind; default lookup is ambiguous"
            );
        }

        if by_name.insert(name.clone(), entry).is_some() {
            tracing::debug!(kind = %kind, name = %name, "Replaced existing entry");
        } else {
            tracing::debug!(kind = %kind, name = %name, "Registered entry");
        }
    }

    /// Exact lookup
    pub fn get_entry(&self, kind: &str, name: &str) -> Option<Arc<dyn Entry>> {
        self.lock()
            .entries
            .get(kind)
            .and_then(|by_name| by_name.get(name))
            .cloned()
    }

    /// Exact lookup, falling back to the entry of `kind` flagged as default
    ///
    /// If more than one entry of the kind is flagged default, which one is
    /// returned is unspecified.
    pub fn get_entry_or_default(&self, kind: &str, name: &str) -> Option<Arc<dyn Entry>> {
        let state = self.lock();
        let by_name = state.entries.get(kind)?;
        by_name
            .get(name)
            .or_else(|| by_name.values().find(|e| e.is_default()))
            .cloned()
    }

    /// Snapshot of every entry of `kind`, ordered by name
    pub fn list_entries_by_kind(&self, kind: &str) -> Vec<Arc<dyn Entry>> {
        let state = self.lock();
        let mut entries: Vec<Arc<dyn Entry>> = state
            .entries
            .get(kind)
            .map(|by_name| by_name.values().cloned().collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        entries
    }

    /// Snapshot of every entry, ordered by kind then name
    pub fn list_entries(&self) -> Vec<Arc<dyn Entry>> {
        let state = self.lock();
        let mut entries: Vec<Arc<dyn Entry>> = state
            .entries
            .values()
            .flat_map(|by_name| by_name.values().cloned())
            .collect();
        entries.sort_by(|a, b| (a.kind(), a.name()).cmp(&(b.kind(), b.name())));
        entries
    }

    /// Removes the entry at `(kind, name)`; no-op if absent
    pub fn remove_entry(&self, kind: &str, name: &str) -> Option<Arc<dyn Entry>> {
        let mut state = self.lock();
        let by_name = state.entries.get_mut(kind)?;
        let removed = by_name.remove(name);
        if by_name.is_empty() {
            state.entries.remove(kind);
        }
        removed
    }

    /// Associates an embedded resource handle with `(kind, name)`
    pub fn map_entry_fs(&self, kind: &str, name: &str, fs: Arc<dyn EmbeddedFs>) {
        self.lock()
            .fs
            .entry(kind.to_string())
            .or_default()
            .insert(name.to_string(), fs);
    }

    /// Embedded resource handle for `(kind, name)`
    pub fn entry_fs(&self, kind: &str, name: &str) -> Option<Arc<dyn EmbeddedFs>> {
        self.lock()
            .fs
            .get(kind)
            .and_then(|by_name| by_name.get(name))
            .cloned()
    }

    /// Drops the resource handle for `(kind, name)`; no-op if absent
    pub fn remove_entry_fs(&self, kind: &str, name: &str) -> Option<Arc<dyn EmbeddedFs>> {
        let mut state = self.lock();
        let by_name = state.fs.get_mut(kind)?;
        let removed = by_name.remove(name);
        if by_name.is_empty() {
            state.fs.remove(kind);
        }
        removed
    }

    /// Records the service name and version reported by the process
    pub fn set_service_info(&self, name: impl Into<String>, version: impl Into<String>) {
        let mut state = self.lock();
        state.service_name = name.into();
        state.service_version = version.into();
    }

    pub fn service_name(&self) -> String {
        self.lock().service_name.clone()
    }

    pub fn service_version(&self) -> String {
        self.lock().service_version.clone()
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Time elapsed since the registry was created
    pub fn uptime(&self) -> Duration {
        Utc::now() - self.start_time
    }

    /// Identifier of this process run, shared by every log line about it
    pub fn event_id(&self) -> Uuid {
        self.event_id
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Registry")
            .field("service_name", &state.service_name)
            .field("service_version", &state.service_version)
            .field("entries", &state.entries.values().map(|m| m.len()).sum::<usize>())
            .field("start_time", &self.start_time)
            .field("event_id", &self.event_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lifecycle::CancelContext;
    use crate::domain::Result;
    use async_trait::async_trait;
    use std::any::Any;

    struct TestEntry {
        kind: &'static str,
        name: &'static str,
        default: bool,
    }

    #[async_trait]
    impl Entry for TestEntry {
        fn name(&self) -> &str {
            self.name
        }

        fn kind(&self) -> &str {
            self.kind
        }

        fn describe(&self) -> String {
            format!("test entry {}", self.name)
        }

        async fn bootstrap(&self, _ctx: &CancelContext) -> Result<()> {
            Ok(())
        }

        async fn interrupt(&self, _ctx: &CancelContext) {}

        fn is_default(&self) -> bool {
            self.default
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn entry(kind: &'static str, name: &'static str, default: bool) -> Arc<dyn Entry> {
        Arc::new(TestEntry { kind, name, default })
    }

    #[test]
    fn test_add_and_get_same_reference() {
        let registry = Registry::new();
        let e = entry("Cert", "tls", false);
        registry.add_entry(e.clone());

        let found = registry.get_entry("Cert", "tls").unwrap();
        assert!(Arc::ptr_eq(&found, &e));
        assert!(registry.get_entry("Cert", "other").is_none());
        assert!(registry.get_entry("Logger", "tls").is_none());
    }

    #[test]
    fn test_add_overwrites() {
        let registry = Registry::new();
        let first = entry("Cert", "tls", false);
        let second = entry("Cert", "tls", false);
        registry.add_entry(first);
        registry.add_entry(second.clone());

        assert_eq!(registry.list_entries_by_kind("Cert").len(), 1);
        assert!(Arc::ptr_eq(&registry.get_entry("Cert", "tls").unwrap(), &second));
    }

    #[test]
    fn test_remove_entry() {
        let registry = Registry::new();
        registry.add_entry(entry("Cert", "tls", false));
        assert!(registry.remove_entry("Cert", "tls").is_some());
        assert!(registry.get_entry("Cert", "tls").is_none());
        assert!(registry.remove_entry("Cert", "tls").is_none());
        assert!(registry.remove_entry("Missing", "x").is_none());
    }

    #[test]
    fn test_get_entry_or_default() {
        let registry = Registry::new();
        registry.add_entry(entry("Logger", "app", false));
        registry.add_entry(entry("Logger", "main", true));

        assert_eq!(registry.get_entry_or_default("Logger", "app").unwrap().name(), "app");
        assert_eq!(
            registry.get_entry_or_default("Logger", "missing").unwrap().name(),
            "main"
        );
        assert!(registry.get_entry_or_default("Cert", "missing").is_none());
    }

    #[test]
    fn test_get_entry_or_default_without_default() {
        let registry = Registry::new();
        registry.add_entry(entry("Logger", "app", false));
        assert!(registry.get_entry_or_default("Logger", "missing").is_none());
    }

    #[test]
    fn test_list_snapshot_survives_mutation() {
        let registry = Registry::new();
        registry.add_entry(entry("Gin", "b", false));
        registry.add_entry(entry("Gin", "a", false));
        registry.add_entry(entry("Cert", "c", false));

        let snapshot = registry.list_entries_by_kind("Gin");
        registry.remove_entry("Gin", "a");

        let names: Vec<&str> = snapshot.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(registry.list_entries_by_kind("Gin").len(), 1);
        assert!(registry.list_entries_by_kind("Missing").is_empty());

        let all: Vec<(String, String)> = registry
            .list_entries()
            .iter()
            .map(|e| (e.kind().to_string(), e.name().to_string()))
            .collect();
        assert_eq!(
            all,
            vec![
                ("Cert".to_string(), "c".to_string()),
                ("Gin".to_string(), "b".to_string())
            ]
        );
    }

    #[test]
    fn test_entry_fs_is_independent_of_entries() {
        let registry = Registry::new();
        let fs: Arc<dyn EmbeddedFs> = Arc::new(StaticFs::new().with_file("index.html", b"hi"));
        registry.map_entry_fs("Docs", "api", fs.clone());

        assert!(registry.get_entry("Docs", "api").is_none());
        let found = registry.entry_fs("Docs", "api").unwrap();
        assert!(Arc::ptr_eq(&found, &fs));
        assert!(registry.entry_fs("Docs", "other").is_none());

        registry.remove_entry_fs("Docs", "api");
        assert!(registry.entry_fs("Docs", "api").is_none());
        assert!(registry.remove_entry_fs("Docs", "api").is_none());
    }

    #[test]
    fn test_service_info_and_metadata() {
        let registry = Registry::new();
        assert_eq!(registry.service_name(), "");
        registry.set_service_info("greeter", "v1.2.0");
        assert_eq!(registry.service_name(), "greeter");
        assert_eq!(registry.service_version(), "v1.2.0");
        assert!(registry.uptime() >= Duration::zero());
        assert_ne!(registry.event_id(), Registry::new().event_id());
    }

    #[test]
    fn test_concurrent_adds_are_linearized() {
        let registry = Arc::new(Registry::new());
        let names: Vec<&'static str> = vec!["a", "b", "c", "d", "e", "f", "g", "h"];
        let handles: Vec<_> = names
            .into_iter()
            .map(|name| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    registry.add_entry(entry("Gin", name, false));
                    registry.get_entry("Gin", name).is_some()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(registry.list_entries_by_kind("Gin").len(), 8);
    }
}
