//! Configuration management for rkboot.
//!
//! This module implements the boot configuration pipeline:
//! parse → override → merge → decode.
//!
//! # Overview
//!
//! - [`loader`] reads the boot document (YAML or TOML) and expands `${VAR}`
//!   placeholders
//! - [`env`] turns `<PREFIX>_*` environment variables into overrides
//! - [`overrides`] parses the `--rkset` grammar (`a.b[0].c=value,...`)
//! - [`merge`] applies overrides onto the document without adding keys
//! - [`decode`] turns the result into typed configuration
//! - [`schema`] holds the sections the core consumes (`app`, `logging`)
//! - [`locale`] matches `realm::region::az::domain` descriptors
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rkboot::config::{load_config, ResolveOptions};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ResolveOptions {
//!     env_prefix: "RK".to_string(),
//!     flag_overrides: Some("gin[0].port=2008".to_string()),
//! };
//! let resolved = load_config("boot.yaml", &options)?;
//! let boot = resolved.boot_config()?;
//! println!("Booting {} {}", boot.app.name, boot.app.version);
//! # Ok(())
//! # }
//! ```
//!
//! # Precedence
//!
//! Environment overrides are merged first and flag overrides last, so a flag
//! wins when both set the same path:
//!
//! ```bash
//! export RK_GIN_0_PORT=8080
//! rkboot --rkset "gin[0].port=2008" run   # port resolves to 2008
//! ```

mod de;
pub mod decode;
pub mod env;
pub mod loader;
pub mod locale;
pub mod merge;
pub mod overrides;
pub mod schema;

// Re-export commonly used types
pub use decode::{decode, decode_section};
pub use env::{env_overrides, env_overrides_from_process, EnvOverrides, OverrideRecord};
pub use loader::{load_config, load_document, parse_document, ResolveOptions, ResolvedDocument};
pub use locale::{Locale, LocaleEnv};
pub use merge::merge;
pub use overrides::parse_overrides;
pub use schema::{AppInfoConfig, BootConfig, LoggingConfig};
