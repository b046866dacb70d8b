#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Geocache in the terminal.

mod board;
mod config;
mod game;
mod input;

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use geocache_storage::{DurableStore, FileStore, MemoryStore};
use tracing_subscriber::EnvFilter;

use crate::{config::Config, game::Game};

/// Collect tokens hidden across the map grid and merge them into a 32.
#[derive(Debug, Parser)]
#[command(name = "geocache", version)]
struct Args {
    /// TOML file overriding rules, start position and storage location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory holding the memory of modified cells.
    #[arg(long, value_name = "DIR")]
    store_dir: Option<PathBuf>,
    /// Keep modified cells in RAM only; nothing is written to disk.
    #[arg(long, conflicts_with = "store_dir")]
    ephemeral: bool,
    /// Read commands from a file instead of standard input.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
    /// Behave as if the device had no position sensor.
    #[arg(long)]
    no_sensor: bool,
}

/// Entry point for the Geocache command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let store: Box<dyn DurableStore> = if args.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        let dir = match args.store_dir {
            Some(dir) => dir,
            None => config.resolve_store_dir()?,
        };
        tracing::debug!(dir = %dir.display(), "opening cell memory");
        Box::new(
            FileStore::new(&dir)
                .with_context(|| format!("failed to open game memory in {}", dir.display()))?,
        )
    };

    let mut game = Game::new(&config, store, !args.no_sensor)?;

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    game.run(input, io::stdout().lock())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
