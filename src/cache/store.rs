//! In-memory calibration store and its persisted format.
//!
//! A [`CalibrationStore`] is an ordered list of entries searched front to
//! back; the earliest usable entry wins. The store is owned by one device
//! session and carries no shared state.
//!
//! # Persisted Format
//!
//! ```text
//! calcache-calibration 1
//! <entry record>
//! <entry record>
//! ```
//!
//! The header names the format and its version. Entry records follow until the
//! stream is exhausted. Any decode failure rejects the whole store; record
//! boundaries cannot be trusted after one record fails.

use std::io::{self, Write};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::cache::entry::{CalibrationBuffers, CalibrationCacheEntry};
use crate::cache::setup::{LiveConfig, SetupFingerprint};
use crate::codec::{self, Codec, DecodeError, Decoder, Encoder};
use crate::registry::ScanMethod;

/// First header token of every persisted store.
pub const STORE_IDENT: &str = "calcache-calibration";

/// Current persisted format version.
pub const FORMAT_VERSION: u32 = 1;

/// Errors that can occur while persisting or loading a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error reading or writing the underlying storage.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The entry stream is malformed or truncated.
    #[error("corrupt calibration store: {0}")]
    Decode(#[from] DecodeError),

    /// The header does not name this format.
    #[error("not a calibration store (header: '{found}')")]
    UnsupportedFormat { found: String },

    /// The store was written by an incompatible format version.
    #[error("unsupported calibration store version {found} (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Age limit applied when looking up entries.
///
/// Only flatbed scans on devices that are not sheet-fed expire; sheet-fed
/// devices and transparency scans keep their calibration indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpiryPolicy {
    max_age: Option<Duration>,
}

impl ExpiryPolicy {
    /// Entries never expire.
    #[must_use]
    pub const fn never() -> Self {
        Self { max_age: None }
    }

    /// Entries expire once older than `max_age`.
    #[must_use]
    pub const fn after(max_age: Duration) -> Self {
        Self {
            max_age: Some(max_age),
        }
    }

    /// Policy from an expiration time in minutes; `0` disables expiry.
    #[must_use]
    pub fn from_minutes(minutes: u64) -> Self {
        const MAX_MINUTES: i64 = i64::MAX / 60_000;
        if minutes == 0 {
            return Self::never();
        }
        let minutes = i64::try_from(minutes).unwrap_or(MAX_MINUTES).min(MAX_MINUTES);
        Self::after(Duration::minutes(minutes))
    }

    #[must_use]
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// True if the entry is too old to be reused at `now`.
    #[must_use]
    pub fn is_expired(&self, entry: &CalibrationCacheEntry, now: DateTime<Utc>) -> bool {
        let Some(max_age) = self.max_age else {
            return false;
        };
        let device = &entry.fingerprint().device;
        let method = entry.fingerprint().params.scan_method;
        if device.sheetfed || method != ScanMethod::Flatbed {
            return false;
        }
        entry.age(now) > max_age
    }
}

/// Ordered collection of calibration entries for one device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalibrationStore {
    entries: Vec<CalibrationCacheEntry>,
    policy: ExpiryPolicy,
}

impl CalibrationStore {
    /// Create an empty store whose entries never expire.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given expiry policy.
    #[must_use]
    pub fn with_policy(policy: ExpiryPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ExpiryPolicy) {
        self.policy = policy;
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CalibrationCacheEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// First entry usable for this setup at `now`, in insertion order.
    #[must_use]
    pub fn find_at(
        &self,
        fingerprint: &SetupFingerprint,
        live: &LiveConfig,
        now: DateTime<Utc>,
    ) -> Option<&CalibrationCacheEntry> {
        self.entries.iter().find(|entry| {
            entry.is_usable_for(fingerprint, live) && !self.policy.is_expired(entry, now)
        })
    }

    /// First entry usable for this setup right now.
    #[must_use]
    pub fn find(
        &self,
        fingerprint: &SetupFingerprint,
        live: &LiveConfig,
    ) -> Option<&CalibrationCacheEntry> {
        self.find_at(fingerprint, live, Utc::now())
    }

    /// Calibration buffers for this setup, or `None` if the device must recalibrate.
    #[must_use]
    pub fn lookup(
        &self,
        fingerprint: &SetupFingerprint,
        live: &LiveConfig,
    ) -> Option<&CalibrationBuffers> {
        let found = self.find(fingerprint, live).map(CalibrationCacheEntry::buffers);
        if found.is_none() {
            log::debug!(
                "Calibration cache miss for {} at {} dpi",
                fingerprint.device.model,
                fingerprint.params.xres
            );
        }
        found
    }

    /// Append an entry without removing older entries for the same setup.
    pub fn insert(&mut self, entry: CalibrationCacheEntry) {
        self.entries.push(entry);
    }

    /// Store a fresh calibration, replacing every entry with the same fingerprint.
    ///
    /// Expiry is not considered here: an outdated entry for this setup is
    /// overwritten just like a current one. Returns the number of entries
    /// replaced.
    pub fn record(
        &mut self,
        fingerprint: SetupFingerprint,
        live: LiveConfig,
        buffers: CalibrationBuffers,
        timestamp: DateTime<Utc>,
    ) -> usize {
        let replaced = self.evict_fingerprint(&fingerprint);
        log::debug!(
            "Recording calibration for {} ({} bytes per average, {} replaced)",
            fingerprint.device.model,
            buffers.average_size(),
            replaced
        );
        self.insert(CalibrationCacheEntry::new(
            fingerprint,
            live,
            buffers,
            timestamp,
        ));
        replaced
    }

    /// Remove every entry computed for `fingerprint`. Returns the number removed.
    pub fn evict_fingerprint(&mut self, fingerprint: &SetupFingerprint) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.fingerprint() != fingerprint);
        before - self.entries.len()
    }

    /// Remove entries the expiry policy rejects at `now`. Returns the number removed.
    pub fn evict_expired(&mut self, now: DateTime<Utc>) -> usize {
        let policy = self.policy;
        let before = self.entries.len();
        self.entries.retain(|entry| !policy.is_expired(entry, now));
        let removed = before - self.entries.len();
        if removed > 0 {
            log::info!("Evicted {} expired calibration entries", removed);
        }
        removed
    }

    /// Write the header and every entry to `writer`.
    pub fn persist<W: Write>(&self, writer: W) -> StoreResult<()> {
        let mut enc = Encoder::new(writer);
        enc.token(STORE_IDENT)?;
        enc.token(FORMAT_VERSION)?;
        enc.newline()?;
        for entry in &self.entries {
            entry.encode(&mut enc)?;
            enc.newline()?;
        }
        enc.finish()?;
        Ok(())
    }

    /// Serialize the store into a byte vector.
    pub fn to_bytes(&self) -> StoreResult<Vec<u8>> {
        let mut out = Vec::new();
        self.persist(&mut out)?;
        Ok(out)
    }

    /// Decode a persisted store. Fails as a whole on any malformed entry.
    pub fn load(input: &[u8], policy: ExpiryPolicy) -> StoreResult<Self> {
        let mut dec = Decoder::from_bytes(input)?;

        let ident = dec
            .next_token("store identifier")
            .map_err(|_| StoreError::UnsupportedFormat {
                found: String::new(),
            })?;
        if ident != STORE_IDENT {
            return Err(StoreError::UnsupportedFormat {
                found: codec::abbreviate(ident),
            });
        }

        let version: u32 = dec.parse("format version")?;
        if version != FORMAT_VERSION {
            return Err(StoreError::VersionMismatch {
                found: version,
                expected: FORMAT_VERSION,
            });
        }

        let entries = codec::decode_remaining(&mut dec)?;
        log::debug!("Decoded {} calibration entries", entries.len());
        Ok(Self { entries, policy })
    }
}
