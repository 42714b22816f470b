//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! boot document.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the boot document
    #[arg(short, long, default_value = "boot.yaml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing boot document");

        println!("📝 Initializing rkboot boot document");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Boot document already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, Self::sample_document()) {
            Ok(_) => {
                println!("✅ Boot document created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Override values per environment:");
                println!("     - RK_APP_NAME=my-service (environment)");
                println!("     - --rkset \"logging.level=debug\" (flag, wins over env)");
                println!("  3. Validate: rkboot validate-config --print");
                println!("  4. Run: rkboot run");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write boot document");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Sample boot document
    fn sample_document() -> &'static str {
        r#"# rkboot boot document
#
# Values can be overridden without editing this file:
#   environment:  RK_APP_VERSION=v1.2.0, RK_LOGGING_LEVEL=debug
#   flags:        rkboot --rkset "app.version=v1.2.0,logging.level=debug" run
# Flags win over environment; both win over this file. Overrides only
# replace keys that already exist here.
#
# ${VAR} placeholders are expanded from the environment (or .env) before
# the document is parsed.

app:
  name: my-service
  version: local
  description: "Service booted by rkboot"
  keywords: []
  homeUrl: ""
  docsUrl: []
  maintainers: []

logging:
  # trace | debug | info | warn | error
  level: info
  # text | json
  format: text
  localEnabled: false
  localPath: ./logs
  # daily | hourly | never
  localRotation: daily
"#
    }
}
