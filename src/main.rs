// rkboot - Bootstrap substrate for long-running services
// Copyright (c) 2025 rkboot Contributors
// Licensed under the MIT License

use clap::Parser;
use rkboot::cli::commands::EXIT_FATAL;
use rkboot::cli::{Cli, Commands};
use rkboot::config::LoggingConfig;
use rkboot::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // `run` configures logging from the boot document itself
    if !matches!(cli.command, Commands::Run(_)) {
        let log_level = cli.log_level.as_deref().unwrap_or("info");
        if let Err(e) = init_logging(log_level, &LoggingConfig::default()) {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    }

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.boot, cli.log_level.as_deref()).await,
        Commands::ValidateConfig(args) => args.execute(&cli.boot).await,
        Commands::Init(args) => args.execute().await,
    }
}
