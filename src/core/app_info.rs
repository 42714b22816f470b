//! Application information entry
//!
//! Built-in entry decoded from the `app` section of the boot document. It
//! carries the service name and version the registry reports.

use crate::config::AppInfoConfig;
use crate::core::lifecycle::CancelContext;
use crate::core::registry::Entry;
use crate::domain::Result;
use async_trait::async_trait;
use std::any::Any;

/// Kind tag of [`AppInfoEntry`]
pub const APP_INFO_ENTRY_KIND: &str = "AppInfoEntry";

/// Describes the running application
#[derive(Debug, Clone)]
pub struct AppInfoEntry {
    config: AppInfoConfig,
}

impl AppInfoEntry {
    pub fn new(config: AppInfoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppInfoConfig {
        &self.config
    }
}

#[async_trait]
impl Entry for AppInfoEntry {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn kind(&self) -> &str {
        APP_INFO_ENTRY_KIND
    }

    fn describe(&self) -> String {
        if self.config.description.is_empty() {
            format!("{} {}", self.config.name, self.config.version)
        } else {
            format!(
                "{} {}: {}",
                self.config.name, self.config.version, self.config.description
            )
        }
    }

    async fn bootstrap(&self, _ctx: &CancelContext) -> Result<()> {
        tracing::info!(
            app = %self.config.name,
            version = %self.config.version,
            keywords = ?self.config.keywords,
            "Application info registered"
        );
        Ok(())
    }

    async fn interrupt(&self, _ctx: &CancelContext) {}

    fn is_default(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
