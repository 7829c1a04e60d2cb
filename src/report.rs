//! Human-readable and JSON summaries of a calibration store.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "source": "/home/user/.cache/calcache/calibration/lide-210.cal",
//!   "format_version": 1,
//!   "entry_count": 1,
//!   "expired_count": 0,
//!   "buffer_bytes": 62400,
//!   "expiration_minutes": 60,
//!   "entries": [
//!     {
//!       "index": 0,
//!       "model": "CanonLide210",
//!       "asic": "Gl124",
//!       "sensor": "CisCanonLide210",
//!       "scan_method": "Flatbed",
//!       "scan_mode": "Color",
//!       "xres": 600,
//!       "yres": 600,
//!       "timestamp": "2026-10-19T08:30:00Z",
//!       "age_seconds": 120,
//!       "expired": false
//!     }
//!   ]
//! }
//! ```

use std::io::Write;

use bytesize::ByteSize;
use chrono::{DateTime, Utc};
use serde::Serialize;
use yansi::Paint;

use crate::cache::{CalibrationCacheEntry, CalibrationStore, FORMAT_VERSION};

/// Summary of a single cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub index: usize,
    pub model: String,
    pub asic: String,
    pub sensor: String,
    pub adc: String,
    pub scan_method: String,
    pub scan_mode: String,
    pub xres: u32,
    pub yres: u32,
    pub depth: u32,
    pub channels: u32,
    pub pixel_count: usize,
    pub channel_count: usize,
    /// Size of each average buffer in bytes
    pub average_size: usize,
    pub timestamp: DateTime<Utc>,
    pub age_seconds: i64,
    /// True if the entry would be rejected on lookup because of its age
    pub expired: bool,
}

impl EntrySummary {
    fn from_entry(
        index: usize,
        entry: &CalibrationCacheEntry,
        expired: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let device = &entry.fingerprint().device;
        let params = &entry.fingerprint().params;
        let buffers = entry.buffers();
        Self {
            index,
            model: device.model.to_string(),
            asic: device.asic.to_string(),
            sensor: device.sensor.to_string(),
            adc: device.adc.to_string(),
            scan_method: params.scan_method.option_str().to_string(),
            scan_mode: params.scan_mode.option_str().to_string(),
            xres: params.xres,
            yres: params.yres,
            depth: params.depth,
            channels: params.channels,
            pixel_count: buffers.pixel_count(),
            channel_count: buffers.channel_count(),
            average_size: buffers.average_size(),
            timestamp: entry.timestamp(),
            age_seconds: entry.age(now).num_seconds(),
            expired,
        }
    }
}

/// Summary of a whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreReport {
    /// Where the store was read from
    pub source: String,
    pub format_version: u32,
    pub entry_count: usize,
    pub expired_count: usize,
    /// Total bytes held by white and dark averages
    pub buffer_bytes: u64,
    /// Expiration time the report was computed with; `None` if expiry is disabled
    pub expiration_minutes: Option<i64>,
    pub entries: Vec<EntrySummary>,
}

impl StoreReport {
    /// Build a report for `store` as seen at `now`.
    #[must_use]
    pub fn new(source: impl Into<String>, store: &CalibrationStore, now: DateTime<Utc>) -> Self {
        let policy = store.policy();
        let entries: Vec<EntrySummary> = store
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                EntrySummary::from_entry(index, entry, policy.is_expired(entry, now), now)
            })
            .collect();

        let buffer_bytes = entries
            .iter()
            .map(|e| 2 * e.average_size as u64)
            .sum();

        Self {
            source: source.into(),
            format_version: FORMAT_VERSION,
            entry_count: entries.len(),
            expired_count: entries.iter().filter(|e| e.expired).count(),
            buffer_bytes,
            expiration_minutes: policy.max_age().map(|age| age.num_minutes()),
            entries,
        }
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render the report as colored text.
    pub fn render_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{} {}", "Calibration store".bold(), self.source)?;
        let expiry = match self.expiration_minutes {
            Some(minutes) => format!("{minutes} min"),
            None => "disabled".to_string(),
        };
        writeln!(
            writer,
            "  format v{}, {} entries, {} of averages, expiry {}",
            self.format_version,
            self.entry_count,
            ByteSize::b(self.buffer_bytes),
            expiry
        )?;

        if self.entries.is_empty() {
            writeln!(writer, "  {}", "(empty)".dim())?;
            return Ok(());
        }

        for entry in &self.entries {
            let status = if entry.expired {
                "expired".yellow().to_string()
            } else {
                "valid".green().to_string()
            };
            writeln!(
                writer,
                "  [{}] {} ({}, {}) {} {} {}x{} dpi, {}-bit x{}",
                entry.index,
                entry.model.bold(),
                entry.asic,
                entry.sensor,
                entry.scan_method,
                entry.scan_mode,
                entry.xres,
                entry.yres,
                entry.depth,
                entry.channels
            )?;
            writeln!(
                writer,
                "      {} pixels x {} channels, {} per average, recorded {} ({}s ago) {}",
                entry.pixel_count,
                entry.channel_count,
                ByteSize::b(entry.average_size as u64),
                entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                entry.age_seconds,
                status
            )?;
        }

        if self.expired_count > 0 {
            writeln!(
                writer,
                "  {}",
                format!("{} expired entries", self.expired_count).yellow()
            )?;
        }
        Ok(())
    }
}
