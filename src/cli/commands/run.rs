//! Run command implementation
//!
//! Boots every configured entry, then blocks until SIGHUP, SIGINT, SIGTERM
//! or SIGQUIT arrives and shuts the entries down in reverse order.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use crate::cli::BootArgs;
use crate::core::Boot;
use crate::domain::Result;
use crate::logging::init_logging;
use clap::Args;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Console level used while resolving when `--log-level` is not given
const RESOLVE_LOG_LEVEL: &str = "info";

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Bootstrap, then shut down immediately instead of waiting for a signal
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, boot_args: &BootArgs, log_level: Option<&str>) -> anyhow::Result<i32> {
        let resolve_level = log_level.unwrap_or(RESOLVE_LOG_LEVEL);
        let boot = match resolve_boot(boot_args, resolve_level, std::io::stderr) {
            Ok(boot) => boot,
            Err(e) => {
                eprintln!("❌ Failed to resolve boot configuration");
                eprintln!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let logging = &boot.config().logging;
        let level = log_level.unwrap_or(logging.level.as_str());
        let _guard = match init_logging(level, logging) {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Failed to initialize logging: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            app = %boot.config().app.name,
            config_path = %boot_args.config,
            "rkboot starting"
        );

        boot.coordinator().listen_for_signals();

        if let Err(e) = boot.bootstrap().await {
            crate::log_error_with_context!(&e, "Bootstrap failed, shutting down");
            eprintln!("❌ Bootstrap failed: {e}");
            boot.shutdown();
            boot.wait_for_shutdown().await;
            return Ok(EXIT_FATAL);
        }

        let entries = boot.entry_order().len();
        println!("✅ {} entries bootstrapped", entries);

        if self.dry_run {
            tracing::info!("Dry run requested, shutting down");
            boot.shutdown();
        } else {
            println!("   Waiting for a termination signal (Ctrl+C to stop)");
        }

        let reason = boot.wait_for_shutdown().await;
        println!();
        println!("⚠️  Shut down: {reason}");
        tracing::info!(
            reason = %reason,
            uptime_secs = boot.registry().uptime().num_seconds(),
            "rkboot stopped"
        );

        Ok(EXIT_OK)
    }
}

/// Builds the boot under a scoped console subscriber
///
/// The global subscriber depends on the resolved `logging` section, so env
/// override warnings and audit lines emitted while resolving go to
/// `make_writer` instead.
fn resolve_boot<W>(boot_args: &BootArgs, level: &str, make_writer: W) -> Result<Boot>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(make_writer)
        .finish();
    tracing::subscriber::with_default(subscriber, || boot_args.builder().build())
}
