//! docdeps CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Overrides;

#[derive(Parser)]
#[command(name = "docdeps")]
#[command(about = "Flatten build-time document dependency graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to docdeps.toml next to the manifest)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a manifest's edges and write the flattened dependency map
    Build {
        /// Build manifest (JSON)
        manifest: PathBuf,

        /// Write the map here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Record a manifest's edges and report recording and closure statistics
    Stats {
        /// Build manifest (JSON)
        manifest: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries JSON output.
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "docdeps={log_level},docdeps_core={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("docdeps v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Build {
            manifest,
            output,
            overrides,
        } => commands::build(&manifest, cli.config.as_deref(), output.as_deref(), &overrides),
        Commands::Stats {
            manifest,
            overrides,
        } => commands::stats(&manifest, cli.config.as_deref(), &overrides),
        Commands::Version => {
            println!("docdeps v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
