//! Core runtime for rkboot.
//!
//! # Modules
//!
//! - [`registry`] - Process-wide catalog of entries keyed by `(kind, name)`
//! - [`lifecycle`] - Signal routing, shutdown hooks and cancellation
//! - [`app_info`] - Built-in entry describing the application
//! - [`boot`] - Orchestration from boot document to running entries
//!
//! # Boot Workflow
//!
//! 1. **Load**: Read `boot.yaml` (or `.toml`) and expand `${VAR}` placeholders
//! 2. **Override**: Merge `RK_*` environment variables, then `--rkset` flags
//! 3. **Register**: Decode each section and add its entries to the registry
//! 4. **Bootstrap**: Start entries in registration order
//! 5. **Wait**: Block until a signal or `shutdown()`, run hooks once
//! 6. **Interrupt**: Stop entries in reverse order
//!
//! # Example
//!
//! ```rust,no_run
//! use rkboot::core::Boot;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let boot = Boot::builder()
//!     .config_path("boot.yaml")
//!     .overrides(Some("app.name=greeter".to_string()))
//!     .build()?;
//!
//! boot.coordinator().listen_for_signals();
//! boot.bootstrap().await?;
//!
//! let reason = boot.wait_for_shutdown().await;
//! println!("Stopped: {}", reason);
//! # Ok(())
//! # }
//! ```

pub mod app_info;
pub mod boot;
pub mod lifecycle;
pub mod registry;

pub use app_info::{AppInfoEntry, APP_INFO_ENTRY_KIND};
pub use boot::{Boot, BootBuilder, Registrar};
pub use lifecycle::{CancelContext, LifecycleCoordinator, LifecycleState, ShutdownReason};
pub use registry::{Entry, Registry};
