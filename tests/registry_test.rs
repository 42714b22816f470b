//! Integration tests for the entry registry
//!
//! These tests verify that:
//! - Entries are stored and returned as the same shared instance
//! - Default lookup falls back only within a kind
//! - Embedded resources are tracked per entry
//! - Concurrent registration from many tasks loses nothing

use async_trait::async_trait;
use rkboot::config::AppInfoConfig;
use rkboot::core::app_info::{AppInfoEntry, APP_INFO_ENTRY_KIND};
use rkboot::core::lifecycle::CancelContext;
use rkboot::core::registry::{downcast_entry, Entry, Registry, StaticFs};
use rkboot::domain::Result;
use std::any::Any;
use std::sync::Arc;

struct CertEntry {
    name: String,
    default: bool,
}

impl CertEntry {
    fn new(name: &str, default: bool) -> Arc<dyn Entry> {
        Arc::new(Self {
            name: name.to_string(),
            default,
        })
    }
}

#[async_trait]
impl Entry for CertEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "CertEntry"
    }

    fn describe(&self) -> String {
        format!("certificate {}", self.name)
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

#[test]
fn test_add_get_remove_same_instance() {
    let registry = Registry::new();
    let entry = CertEntry::new("tls", false);

    registry.add_entry(entry.clone());

    let found = registry.get_entry("CertEntry", "tls").unwrap();
    assert!(Arc::ptr_eq(&found, &entry));

    let removed = registry.remove_entry("CertEntry", "tls").unwrap();
    assert!(Arc::ptr_eq(&removed, &entry));
    assert!(registry.get_entry("CertEntry", "tls").is_none());
    assert!(registry.remove_entry("CertEntry", "tls").is_none());
}

#[test]
fn test_same_name_different_kinds() {
    let registry = Registry::new();
    let config = AppInfoConfig {
        name: "shared".to_string(),
        ..AppInfoConfig::default()
    };
    registry.add_entry(Arc::new(AppInfoEntry::new(config)));
    registry.add_entry(CertEntry::new("shared", false));

    assert_eq!(
        registry.get_entry(APP_INFO_ENTRY_KIND, "shared").unwrap().kind(),
        APP_INFO_ENTRY_KIND
    );
    assert_eq!(
        registry.get_entry("CertEntry", "shared").unwrap().kind(),
        "CertEntry"
    );
    assert_eq!(registry.list_entries().len(), 2);
}

#[test]
fn test_default_lookup() {
    let registry = Registry::new();
    registry.add_entry(CertEntry::new("primary", true));
    registry.add_entry(CertEntry::new("backup", false));

    let exact = registry.get_entry_or_default("CertEntry", "backup").unwrap();
    assert_eq!(exact.name(), "backup");

    let fallback = registry.get_entry_or_default("CertEntry", "unknown").unwrap();
    assert_eq!(fallback.name(), "primary");

    assert!(registry.get_entry_or_default("GinEntry", "unknown").is_none());
    assert!(registry.get_entry("CertEntry", "unknown").is_none());
}

#[test]
fn test_list_entries_by_kind_sorted() {
    let registry = Registry::new();
    for name in ["zeta", "alpha", "mid"] {
        registry.add_entry(CertEntry::new(name, false));
    }

    let names: Vec<String> = registry
        .list_entries_by_kind("CertEntry")
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    assert!(registry.list_entries_by_kind("GinEntry").is_empty());
}

#[test]
fn test_downcast_app_info() {
    let registry = Registry::new();
    registry.add_entry(Arc::new(AppInfoEntry::new(AppInfoConfig::default())));

    let entry = registry.get_entry(APP_INFO_ENTRY_KIND, "rkboot").unwrap();
    let app = downcast_entry::<AppInfoEntry>(&entry).unwrap();
    assert_eq!(app.config().version, "local");
    assert!(downcast_entry::<CertEntry>(&entry).is_none());
}

#[test]
fn test_entry_fs_lifecycle() {
    let registry = Registry::new();
    let fs = Arc::new(StaticFs::new().with_file("docs/index.html", b"<html></html>"));

    registry.map_entry_fs("DocsEntry", "docs", fs);

    let handle = registry.entry_fs("DocsEntry", "docs").unwrap();
    assert_eq!(
        handle.open("./docs/index.html").as_deref(),
        Some(&b"<html></html>"[..])
    );
    assert!(handle.open("docs/missing.html").is_none());

    assert!(registry.remove_entry_fs("DocsEntry", "docs").is_some());
    assert!(registry.entry_fs("DocsEntry", "docs").is_none());
}

#[test]
fn test_service_info_and_event_id() {
    let registry = Registry::new();
    registry.set_service_info("greeter", "v1.0.0");

    assert_eq!(registry.service_name(), "greeter");
    assert_eq!(registry.service_version(), "v1.0.0");
    assert!(registry.uptime() >= chrono::Duration::zero());
    assert_ne!(registry.event_id(), Registry::new().event_id());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration() {
    let registry = Arc::new(Registry::new());

    let tasks: Vec<_> = (0..64)
        .map(|i| {
            let registry = registry.clone();
            tokio::spawn(async move {
                registry.add_entry(CertEntry::new(&format!("cert-{i:02}"), false));
                registry.get_entry("CertEntry", &format!("cert-{i:02}")).is_some()
            })
        })
        .collect();

    for result in futures::future::join_all(tasks).await {
        assert!(result.unwrap());
    }
    assert_eq!(registry.list_entries_by_kind("CertEntry").len(), 64);
}
