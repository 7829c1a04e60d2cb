//! Handlers for the calcache subcommands.
//!
//! Each handler writes its normal output to the given writer and returns the
//! exit code. Errors that should abort the command are returned as
//! [`anyhow::Error`] with context; [`crate::error::ExitCode::for_error`]
//! maps them to an exit code.

use std::io::Write;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use yansi::Paint;

use crate::cache::{CacheStorage, CalibrationCache, ExpiryPolicy, FileStorage, LoadOutcome};
use crate::cli::{InspectArgs, PruneArgs, StoreTarget, VerifyArgs};
use crate::config::Config;
use crate::error::ExitCode;
use crate::report::StoreReport;

/// Resolve a store argument to its file storage.
pub fn resolve_target(target: &StoreTarget, config: &Config) -> Result<FileStorage> {
    match (&target.path, &target.device) {
        (Some(path), _) => Ok(FileStorage::new(path)),
        (None, Some(device)) => config.storage_for(device),
        (None, None) => bail!("Either a store path or --device is required"),
    }
}

fn policy_for(override_minutes: Option<u64>, config: &Config) -> ExpiryPolicy {
    override_minutes.map_or_else(|| config.expiry_policy(), ExpiryPolicy::from_minutes)
}

/// Open a store strictly; a missing store is an error.
fn open_existing(
    storage: FileStorage,
    policy: ExpiryPolicy,
) -> Result<CalibrationCache<FileStorage>> {
    let described = storage.describe();
    let cache = CalibrationCache::try_open(storage, policy)
        .with_context(|| format!("Failed to load calibration store {described}"))?;
    if *cache.outcome() == LoadOutcome::Missing {
        bail!("No calibration store at {described}");
    }
    Ok(cache)
}

/// Summarize the entries of a store.
pub fn inspect<W: Write>(
    args: &InspectArgs,
    config: &Config,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<ExitCode> {
    let storage = resolve_target(&args.target, config)?;
    let cache = open_existing(storage, policy_for(args.expiration_minutes, config))?;
    let report = StoreReport::new(cache.storage().describe(), cache.store(), now);

    if args.json {
        let json = report.to_json().context("Failed to serialize report")?;
        writeln!(out, "{json}")?;
    } else {
        report.render_text(out)?;
    }
    Ok(ExitCode::Success)
}

/// Strictly decode a store.
///
/// Corruption is reported on `out` and yields [`ExitCode::CorruptStore`];
/// I/O failures and a missing store are returned as errors.
pub fn verify<W: Write>(args: &VerifyArgs, config: &Config, out: &mut W) -> Result<ExitCode> {
    let storage = resolve_target(&args.target, config)?;
    let described = storage.describe();

    match open_existing(storage, config.expiry_policy()) {
        Ok(cache) => {
            writeln!(
                out,
                "{} {} ({} entries)",
                "OK".green().bold(),
                described,
                cache.store().len()
            )?;
            Ok(ExitCode::Success)
        }
        Err(err) if ExitCode::for_error(&err) == ExitCode::CorruptStore => {
            log::debug!("Verification failed: {:#}", err);
            writeln!(out, "{} {}: {:#}", "CORRUPT".red().bold(), described, err)?;
            Ok(ExitCode::CorruptStore)
        }
        Err(err) => Err(err),
    }
}

/// Remove expired entries and rewrite the store.
///
/// A corrupt store is left untouched and reported as an error.
pub fn prune<W: Write>(
    args: &PruneArgs,
    config: &Config,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<ExitCode> {
    let storage = resolve_target(&args.target, config)?;
    let policy = policy_for(args.expiration_minutes, config);
    let mut cache = open_existing(storage, policy)?;
    let described = cache.storage().describe();

    if policy.max_age().is_none() {
        writeln!(out, "Expiry is disabled; {described} left unchanged")?;
        return Ok(ExitCode::Success);
    }

    if args.dry_run {
        let expired = cache
            .store()
            .entries()
            .iter()
            .filter(|entry| policy.is_expired(entry, now))
            .count();
        writeln!(
            out,
            "Would remove {} of {} entries from {}",
            expired,
            cache.store().len(),
            described
        )?;
        return Ok(ExitCode::Success);
    }

    let removed = cache.store_mut().evict_expired(now);
    if removed > 0 {
        cache
            .save()
            .with_context(|| format!("Failed to rewrite calibration store {described}"))?;
    }
    writeln!(
        out,
        "Removed {} expired entries from {} ({} remaining)",
        removed,
        described,
        cache.store().len()
    )?;
    Ok(ExitCode::Success)
}

/// Print the effective configuration as TOML.
pub fn show_config<W: Write>(config: &Config, out: &mut W) -> Result<ExitCode> {
    write!(out, "{}", config.to_toml()?)?;
    Ok(ExitCode::Success)
}
