//! apkforge - Android packaging for SDL2 Rust games
//!
//! Command-line entry point: parses arguments, sets up logging and loads the
//! run configuration before dispatching to a command.

use std::path::PathBuf;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use apkforge::commands::{BuildCommand, CargoConfigCommand, CheckCommand};
use apkforge::core::{PipelineConfig, APP_NAME, VERSION};

#[derive(Parser)]
#[command(name = "apkforge")]
#[command(about = "Package an SDL2 Rust game as an Android APK")]
#[command(version)]
struct Cli {
    /// Config file path (defaults to ./apkforge.toml when present)
    #[arg(short, long, global = true, env = "APKFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up the Android project if needed and build the APK (default)
    Build,

    /// Check required directories and tools
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print or write the cargo config for the NDK toolchains
    #[command(name = "cargo-config")]
    CargoConfig {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;

    debug!("{} v{} starting...", APP_NAME, VERSION);

    let config = PipelineConfig::load_or_default(cli.config.as_deref()).await?;
    config.validate()?;

    match cli.command.unwrap_or(Commands::Build) {
        Commands::Build => {
            BuildCommand { config }.execute().await?;
        }
        Commands::Check { json } => {
            if !(CheckCommand { config, json }).execute()? {
                std::process::exit(1);
            }
        }
        Commands::CargoConfig { output } => {
            CargoConfigCommand { config, output }.execute().await?;
        }
    }

    Ok(())
}

/// Install the fmt subscriber; `RUST_LOG` takes precedence over the flags
fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {}", e))
}
