//! Logging setup for calcache.
//!
//! Uses the `log` facade with the `env_logger` backend. The level is chosen,
//! in priority order, by:
//!
//! 1. The `RUST_LOG` environment variable, if set
//! 2. `--quiet` (errors only) or `-v` / `-vv` (debug / trace)
//! 3. Otherwise warnings, so cache discards are always visible
//!
//! Debug builds prefix each line with a timestamp and, when verbose, the
//! module path. Release builds print level and message only.

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize logging from the CLI verbosity flags.
///
/// Calling this more than once is harmless; later calls are ignored.
///
/// # Example
///
/// ```rust,no_run
/// use calcache::logging::init_logging;
///
/// init_logging(1, false);
/// log::debug!("Debug output enabled");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) {
    let from_env = env::var("RUST_LOG").is_ok();
    let mut builder = Builder::new();

    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        return;
    }

    if from_env {
        log::debug!("Logging configured from RUST_LOG");
    } else {
        log::debug!(
            "Logging initialized at level: {:?}",
            determine_level(verbose, quiet)
        );
    }
}

/// Map CLI flags to a level filter. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let level = record.level();
            let style = buf.default_level_style(level);
            if verbose >= 2 {
                writeln!(
                    buf,
                    "{} {style}{:<5}{style:#} [{}] {}",
                    buf.timestamp_seconds(),
                    level,
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{} {style}{:<5}{style:#} {}",
                    buf.timestamp_seconds(),
                    level,
                    record.args()
                )
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let style = buf.default_level_style(level);
            writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
        });
    }
}
