//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for rkboot using clap.

pub mod commands;

use crate::config::env::DEFAULT_ENV_PREFIX;
use crate::config::loader::DEFAULT_BOOT_PATH;
use crate::core::{Boot, BootBuilder};
use clap::{Args, Parser, Subcommand};

/// rkboot - Bootstrap substrate for long-running services
#[derive(Parser, Debug)]
#[command(name = "rkboot")]
#[command(version, about, long_about = None)]
#[command(author = "rkboot Contributors")]
pub struct Cli {
    #[command(flatten)]
    pub boot: BootArgs,

    /// Log level (trace, debug, info, warn, error); defaults to logging.level
    #[arg(short, long, env = "RKBOOT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the boot document comes from and how it is overridden
#[derive(Args, Debug, Clone)]
pub struct BootArgs {
    /// Path to the boot document (YAML, or TOML for `.toml`)
    #[arg(short, long, default_value = DEFAULT_BOOT_PATH, env = "RKBOOT_CONFIG")]
    pub config: String,

    /// Overrides in the form `path=value,path=value`, e.g. `gin[0].port=8080`
    #[arg(long)]
    pub rkset: Option<String>,

    /// Prefix of environment overrides, e.g. `RK_GIN_0_PORT`
    #[arg(long, default_value = DEFAULT_ENV_PREFIX)]
    pub env_prefix: String,
}

impl BootArgs {
    /// Starts a [`Boot`] builder configured from these arguments
    pub fn builder(&self) -> BootBuilder {
        Boot::builder()
            .config_path(&self.config)
            .env_prefix(&self.env_prefix)
            .overrides(self.rkset.clone())
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Boot every configured entry and block until a termination signal
    Run(commands::run::RunArgs),

    /// Resolve the boot document and report the applied overrides
    ValidateConfig(commands::validate::ValidateArgs),

    /// Write a sample boot document
    Init(commands::init::InitArgs),
}
