//! Command-line interface definitions for calcache.
//!
//! The binary inspects and maintains the calibration stores a scanner driver
//! writes. Each store is named either by its file path or by a device name
//! resolved inside the configured cache directory.
//!
//! # Example
//!
//! ```bash
//! # Summarize the entries of a store
//! calcache inspect ~/.cache/calcache/calibration/lide-210.cal
//!
//! # Same, resolving the device in the cache directory, as JSON
//! calcache inspect --device lide-210 --json
//!
//! # Fail with exit code 2 if the store is corrupt
//! calcache verify --device lide-210
//!
//! # Drop calibrations older than 30 minutes
//! calcache prune --device lide-210 --expiration-minutes 30
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Inspect and maintain persisted scanner calibration caches.
#[derive(Debug, Parser)]
#[command(name = "calcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Path to an alternative config file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize the entries of a calibration store
    Inspect(InspectArgs),
    /// Strictly decode a calibration store and report corruption
    Verify(VerifyArgs),
    /// Remove expired entries and rewrite the store
    Prune(PruneArgs),
    /// Print the effective configuration as TOML
    Config,
}

/// Which store a command operates on.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct StoreTarget {
    /// Path to a calibration store file
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Device name resolved in the configured cache directory
    #[arg(short, long, value_name = "NAME")]
    pub device: Option<String>,
}

/// Arguments for the inspect subcommand.
#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub target: StoreTarget,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the configured expiration time when judging entry age
    ///
    /// 0 disables expiry.
    #[arg(long, value_name = "MINUTES")]
    pub expiration_minutes: Option<u64>,
}

/// Arguments for the verify subcommand.
#[derive(Debug, Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub target: StoreTarget,
}

/// Arguments for the prune subcommand.
#[derive(Debug, Args)]
pub struct PruneArgs {
    #[command(flatten)]
    pub target: StoreTarget,

    /// Override the configured expiration time
    ///
    /// 0 disables expiry, which leaves the store unchanged.
    #[arg(long, value_name = "MINUTES")]
    pub expiration_minutes: Option<u64>,

    /// Report what would be removed without rewriting the store
    #[arg(long)]
    pub dry_run: bool,
}
