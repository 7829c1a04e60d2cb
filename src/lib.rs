//! calcache - Persistent shading calibration cache for flatbed scanner drivers
//!
//! A scanner driver spends seconds per scan measuring white and dark
//! reference averages. This crate lets it keep those measurements across
//! sessions: a [`cache::CalibrationStore`] records them keyed by a
//! [`cache::SetupFingerprint`] of the device and scan setup, a positional text
//! [`codec`] persists them, and [`cache::CalibrationCache`] ties a store to its
//! storage backend.
//!
//! The `calcache` binary inspects, verifies and prunes persisted stores.

pub mod cache;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;
pub mod report;

use anyhow::Result;
use chrono::Utc;

use cli::{Cli, Commands};
use config::Config;
use error::ExitCode;

/// Run the command-line application.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    let config = match &cli.config {
        Some(path) => Config::try_load_from_path(path)?,
        None => Config::load(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Inspect(args) => commands::inspect(args, &config, Utc::now(), &mut out),
        Commands::Verify(args) => commands::verify(args, &config, &mut out),
        Commands::Prune(args) => commands::prune(args, &config, Utc::now(), &mut out),
        Commands::Config => commands::show_config(&config, &mut out),
    }
}
