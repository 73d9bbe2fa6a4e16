//! stegtools - hide messages in audio, images, video frames and HTML
//!
//! A CLI front-end for the stegtools library. Carriers are read from disk,
//! modified in memory, and written to a new path.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use commands::{CapacityCommand, CommandExecutor, HideCommand, RevealCommand};
use stegtools::StegConfig;

/// stegtools - hide messages in audio, images, video frames and HTML
///
/// LSB steganography for WAV, PNG/BMP and frame directories, plus comment and
/// hidden-marker insertion for HTML. Messages are stored in clear.
#[derive(Parser)]
#[command(name = "stegtools")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to ~/.stegtools/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message inside a carrier
    Hide(HideCommand),

    /// Recover a hidden message from a carrier
    Reveal(RevealCommand),

    /// Show how many message bytes fit in a carrier
    Capacity(CapacityCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = StegConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(?config, "effective defaults");

    let command: &dyn CommandExecutor = match &cli.command {
        Commands::Hide(cmd) => cmd,
        Commands::Reveal(cmd) => cmd,
        Commands::Capacity(cmd) => cmd,
    };

    command.execute(&config)
}
