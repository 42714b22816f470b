//! Integration tests for boot orchestration
//!
//! These tests drive a boot document from disk through registrars,
//! bootstrap and shutdown using a small in-test entry that records what
//! happens to it.

use async_trait::async_trait;
use rkboot::config::{decode, Locale, LocaleEnv};
use rkboot::core::app_info::APP_INFO_ENTRY_KIND;
use rkboot::core::lifecycle::{CancelContext, LifecycleCoordinator, ShutdownReason};
use rkboot::core::registry::{Entry, Registry};
use rkboot::core::Boot;
use rkboot::domain::{BootError, Result};
use serde::Deserialize;
use std::any::Any;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

type Journal = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Deserialize)]
struct ServerConfig {
    name: String,
    port: u16,
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    locale: String,
}

struct ServerEntry {
    kind: &'static str,
    config: ServerConfig,
    journal: Journal,
}

#[async_trait]
impl Entry for ServerEntry {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn kind(&self) -> &str {
        self.kind
    }

    fn describe(&self) -> String {
        format!("{} on :{}", self.kind, self.config.port)
    }

    async fn bootstrap(&self, ctx: &CancelContext) -> Result<()> {
        if ctx.is_cancelled() {
            return Err(BootError::Lifecycle("cancelled before start".to_string()));
        }
        if self.config.port < 1024 {
            return Err(BootError::Validation(format!(
                "port {} is privileged",
                self.config.port
            )));
        }
        self.journal
            .lock()
            .unwrap()
            .push(format!("bootstrap {}/{}", self.kind, self.config.name));
        Ok(())
    }

    async fn interrupt(&self, _ctx: &CancelContext) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("interrupt {}/{}", self.kind, self.config.name));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

const BOOT_YAML: &str = r#"
app:
  name: greeter
  version: v2.0.0
gin:
  - name: public
    port: 8080
    enabled: true
    locale: ""
  - name: admin
    port: 8081
    enabled: true
    locale: "*::*::*::*"
  - name: disabled
    port: 8082
    enabled: false
grpc:
  - name: rpc
    port: 9090
    enabled: true
"#;

fn write_boot(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn server_registrar(
    kind: &'static str,
    journal: Journal,
) -> impl Fn(&rkboot::domain::Node) -> Result<Vec<Arc<dyn Entry>>> + Send + Sync + 'static {
    move |section| {
        let configs: Vec<ServerConfig> = decode(section)?;
        let env = LocaleEnv::default();
        let mut entries: Vec<Arc<dyn Entry>> = Vec::new();
        for config in configs {
            let locale: Locale = config.locale.parse()?;
            if !config.enabled || !locale.matches(&env) {
                continue;
            }
            entries.push(Arc::new(ServerEntry {
                kind,
                config,
                journal: journal.clone(),
            }));
        }
        Ok(entries)
    }
}

#[tokio::test]
async fn test_full_lifecycle() {
    let file = write_boot(BOOT_YAML);
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));

    let boot = Boot::builder()
        .config_path(file.path())
        .env_prefix("RKBOOT_IT_FULL")
        .registrar("gin", server_registrar("GinEntry", journal.clone()))
        .registrar("grpc", server_registrar("GrpcEntry", journal.clone()))
        .registrar("prometheus", server_registrar("PromEntry", journal.clone()))
        .build()
        .unwrap();

    let registry = boot.registry();
    assert_eq!(registry.service_name(), "greeter");
    assert_eq!(registry.service_version(), "v2.0.0");
    assert!(registry.get_entry(APP_INFO_ENTRY_KIND, "greeter").is_some());
    assert_eq!(registry.list_entries_by_kind("GinEntry").len(), 2);
    assert!(registry.get_entry("GinEntry", "disabled").is_none());
    assert!(registry.list_entries_by_kind("PromEntry").is_empty());

    boot.bootstrap().await.unwrap();

    let closed = journal.clone();
    boot.coordinator().add_shutdown_hook("close-pools", move || {
        closed.lock().unwrap().push("hook close-pools".to_string());
    });

    boot.shutdown();
    let reason = boot.wait_for_shutdown().await;
    assert_eq!(reason, ShutdownReason::Cancelled);

    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "bootstrap GinEntry/public",
            "bootstrap GinEntry/admin",
            "bootstrap GrpcEntry/rpc",
            "hook close-pools",
            "interrupt GrpcEntry/rpc",
            "interrupt GinEntry/admin",
            "interrupt GinEntry/public",
        ]
    );
}

#[tokio::test]
async fn test_overrides_shape_registration() {
    let file = write_boot(BOOT_YAML);
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));

    let boot = Boot::builder()
        .config_path(file.path())
        .env_prefix("RKBOOT_IT_OVERRIDES")
        .overrides(Some(
            "gin[2].enabled=true,gin[0].port=2008,grpc[0].enabled=false,prom.port=1".to_string(),
        ))
        .registrar("gin", server_registrar("GinEntry", journal.clone()))
        .registrar("grpc", server_registrar("GrpcEntry", journal.clone()))
        .build()
        .unwrap();

    let registry = boot.registry();
    assert!(registry.get_entry("GinEntry", "disabled").is_some());
    assert!(registry.get_entry("GrpcEntry", "rpc").is_none());
    assert_eq!(
        registry.get_entry("GinEntry", "public").unwrap().describe(),
        "GinEntry on :2008"
    );
    // Overrides never introduce sections
    assert!(boot.resolved().node.get("prom").is_none());
    assert_eq!(boot.overrides_applied().len(), 4);
}

#[tokio::test]
async fn test_bootstrap_failure_stops_sequence() {
    let file = write_boot(BOOT_YAML);
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));

    let boot = Boot::builder()
        .config_path(file.path())
        .env_prefix("RKBOOT_IT_FAILURE")
        .overrides(Some("gin[1].port=80".to_string()))
        .registrar("gin", server_registrar("GinEntry", journal.clone()))
        .registrar("grpc", server_registrar("GrpcEntry", journal.clone()))
        .build()
        .unwrap();

    let err = boot.bootstrap().await.unwrap_err();
    match err {
        BootError::Entry { kind, name, message } => {
            assert_eq!(kind, "GinEntry");
            assert_eq!(name, "admin");
            assert!(message.contains("privileged"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*journal.lock().unwrap(), vec!["bootstrap GinEntry/public"]);

    // Started entries are still interrupted on the way out
    boot.shutdown();
    boot.wait_for_shutdown().await;
    assert!(journal
        .lock()
        .unwrap()
        .contains(&"interrupt GinEntry/public".to_string()));
}

#[tokio::test]
async fn test_registrar_error_fails_build() {
    let file = write_boot(BOOT_YAML);
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));

    let result = Boot::builder()
        .config_path(file.path())
        .env_prefix("RKBOOT_IT_REGISTRAR")
        .overrides(Some("gin[0].locale=prod::us".to_string()))
        .registrar("gin", server_registrar("GinEntry", journal))
        .build();

    assert!(result.is_err());
}

#[tokio::test]
async fn test_shared_registry_and_coordinator() {
    let file = write_boot(BOOT_YAML);
    let registry = Arc::new(Registry::new());
    let coordinator = Arc::new(LifecycleCoordinator::new());

    let boot = Boot::builder()
        .config_path(file.path())
        .env_prefix("RKBOOT_IT_SHARED")
        .registry(registry.clone())
        .coordinator(coordinator.clone())
        .build()
        .unwrap();

    assert!(Arc::ptr_eq(boot.registry(), &registry));
    assert!(registry.get_entry(APP_INFO_ENTRY_KIND, "greeter").is_some());

    let waiter = tokio::spawn(async move { boot.wait_for_shutdown().await });
    coordinator.shutdown();
    assert_eq!(waiter.await.unwrap(), ShutdownReason::Cancelled);
}

#[tokio::test]
async fn test_missing_document_fails_build() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = Boot::builder()
        .config_path(dir.path().join("boot.yaml"))
        .build();
    assert!(matches!(result, Err(BootError::Configuration(_))));
}
