//! stepchain CLI - runs the demo chain and manages stepchain.toml.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stepchain_core::ReporterKind;

mod commands;
mod cpu;

#[derive(Parser)]
#[command(name = "stepchain")]
#[command(about = "Sequential step chains over a long-lived fixture", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding stepchain.toml
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo chain against a toy CPU fixture
    Demo {
        /// Divide by zero mid-program to show a fault halting the chain
        #[arg(long)]
        fault: bool,
        /// Use timed steps
        #[arg(long)]
        timed: bool,
        /// Override the configured reporter (console, tracing, quiet)
        #[arg(long)]
        reporter: Option<ReporterKind>,
    },
    /// Write a default stepchain.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=stepchain_core=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            fault,
            timed,
            reporter,
        } => commands::demo::run(&cli.dir, reporter, fault, timed),
        Commands::Init { force } => commands::init::run(&cli.dir, force),
        Commands::Config => commands::config::show(&cli.dir),
    }
}
