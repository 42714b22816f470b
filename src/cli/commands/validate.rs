//! Validate config command implementation
//!
//! This module implements the `validate-config` command: it resolves the boot
//! document with every override applied and reports what changed.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use crate::cli::BootArgs;
use crate::config::loader::{load_config, ResolveOptions};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Print the resolved document as YAML
    #[arg(long)]
    pub print: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, boot_args: &BootArgs) -> anyhow::Result<i32> {
        tracing::info!(config_path = %boot_args.config, "Validating boot configuration");

        println!("🔍 Validating boot document: {}", boot_args.config);
        println!();

        let options = ResolveOptions {
            env_prefix: boot_args.env_prefix.clone(),
            flag_overrides: boot_args.rkset.clone(),
        };

        let resolved = match load_config(&boot_args.config, &options) {
            Ok(r) => {
                println!("✅ Boot document loaded and overrides applied");
                r
            }
            Err(e) => {
                println!("❌ Failed to resolve boot document");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let config = match resolved.boot_config() {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Application: {}", config.app.name);
        println!("  Version: {}", config.app.version);
        if !config.app.description.is_empty() {
            println!("  Description: {}", config.app.description);
        }
        println!("  Log Level: {}", config.logging.level);
        println!("  Log Format: {}", config.logging.format);
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }

        let sections = resolved
            .node
            .as_map()
            .map(|m| m.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        println!("  Sections: {}", sections.join(", "));

        println!();
        if resolved.env_records.is_empty() {
            println!("Environment overrides ({}_*): none", boot_args.env_prefix);
        } else {
            println!("Environment overrides ({}_*):", boot_args.env_prefix);
            for record in &resolved.env_records {
                println!("  {} -> {} = {}", record.env_key, record.path, record.value);
            }
        }

        if resolved.flag_assignments.is_empty() {
            println!("Flag overrides (--rkset): none");
        } else {
            println!("Flag overrides (--rkset):");
            for assignment in &resolved.flag_assignments {
                println!("  {assignment}");
            }
        }

        if self.print {
            match serde_yaml::to_string(&resolved.node) {
                Ok(yaml) => {
                    println!();
                    println!("Resolved document:");
                    println!("{yaml}");
                }
                Err(e) => {
                    println!("❌ Failed to render resolved document");
                    println!("   Error: {e}");
                    return Ok(EXIT_FATAL);
                }
            }
        }

        println!();
        Ok(EXIT_OK)
    }
}
