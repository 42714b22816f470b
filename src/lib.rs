// rkboot - Bootstrap substrate for long-running services
// Copyright (c) 2025 rkboot Contributors
// Licensed under the MIT License

//! # rkboot - Bootstrap substrate for long-running services
//!
//! rkboot turns a declarative boot document into a set of running components
//! ("entries") and shuts them down cleanly when the process is asked to stop.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resolving** a YAML or TOML boot document with environment and CLI
//!   overrides layered on top
//! - **Decoding** sections of the resolved document into typed configuration
//! - **Registering** entries in a process-wide registry keyed by
//!   `(kind, name)`
//! - **Coordinating** shutdown: signals, hooks and cancellation, exactly once
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Registry, lifecycle coordinator and boot orchestration
//! - [`domain`] - Generic document nodes, override paths and errors
//! - [`config`] - Boot document loading, overrides, merge and decode
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rkboot::config::decode;
//! use rkboot::core::{Boot, Entry};
//! use serde::Deserialize;
//! use std::sync::Arc;
//!
//! #[derive(Deserialize)]
//! struct GinConfig {
//!     name: String,
//!     port: u16,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let boot = Boot::builder()
//!         .config_path("boot.yaml")
//!         .registrar("gin", |section| {
//!             let servers: Vec<GinConfig> = decode(section)?;
//!             // Build one entry per configured server
//!             # let _ = servers;
//!             Ok(Vec::<Arc<dyn Entry>>::new())
//!         })
//!         .build()?;
//!
//!     boot.coordinator().listen_for_signals();
//!     boot.bootstrap().await?;
//!     boot.wait_for_shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Overrides
//!
//! Overrides only replace values that already exist in the boot document;
//! they never add keys. Flags beat environment variables:
//!
//! ```rust
//! use rkboot::config::{env_overrides, merge, parse_overrides};
//! use rkboot::domain::Node;
//! use serde_json::json;
//!
//! let mut doc = Node::from(json!({"gin": [{"port": 8080, "enabled": true}]}));
//!
//! let env = env_overrides([("RK_GIN_0_PORT", "9090")], "RK");
//! merge(&mut doc, &env.node);
//!
//! let flags = parse_overrides("gin[0].port=2008,gin[0].enabled=false").unwrap();
//! merge(&mut doc, &flags);
//!
//! assert_eq!(doc, Node::from(json!({"gin": [{"port": 2008, "enabled": false}]})));
//! ```
//!
//! ## Error Handling
//!
//! rkboot uses the [`domain::BootError`] type for all errors:
//!
//! ```rust,no_run
//! use rkboot::domain::BootError;
//! use rkboot::config::{load_config, ResolveOptions};
//!
//! fn example() -> Result<(), BootError> {
//!     let resolved = load_config("boot.yaml", &ResolveOptions::default())?;
//!     let _config = resolved.boot_config()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! rkboot uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(kind = "GinEntry", name = "public", "Bootstrapping entry");
//! warn!(env_key = "RK_GIN__PORT", "Skipping malformed environment override");
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
