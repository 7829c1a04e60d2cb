//! Calibration cache entry definitions.

use std::io::{self, Write};

use chrono::{DateTime, Duration, Timelike, Utc};
use thiserror::Error;

use crate::cache::setup::{FrontendSnapshot, LiveConfig, SensorSnapshot, SetupFingerprint};
use crate::codec::{Codec, DecodeError, Decoder, Encoder};

/// Average buffers whose lengths disagree with the declared average size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("average buffers do not match average size {average_size}: white {white} bytes, dark {dark} bytes")]
pub struct BufferSizeMismatch {
    pub average_size: usize,
    pub white: usize,
    pub dark: usize,
}

/// White and dark shading averages produced by one calibration run.
///
/// Both buffers always hold exactly `average_size` bytes. How `pixel_count` and
/// `channel_count` relate to that size is up to the calibration algorithm and
/// is recorded here without being re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalibrationBuffers {
    pixel_count: usize,
    channel_count: usize,
    average_size: usize,
    white_average: Vec<u8>,
    dark_average: Vec<u8>,
}

impl CalibrationBuffers {
    /// Bundle calibration averages, checking both buffers against `average_size`.
    pub fn new(
        pixel_count: usize,
        channel_count: usize,
        average_size: usize,
        white_average: Vec<u8>,
        dark_average: Vec<u8>,
    ) -> Result<Self, BufferSizeMismatch> {
        if white_average.len() != average_size || dark_average.len() != average_size {
            return Err(BufferSizeMismatch {
                average_size,
                white: white_average.len(),
                dark: dark_average.len(),
            });
        }
        Ok(Self {
            pixel_count,
            channel_count,
            average_size,
            white_average,
            dark_average,
        })
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    #[must_use]
    pub fn average_size(&self) -> usize {
        self.average_size
    }

    #[must_use]
    pub fn white_average(&self) -> &[u8] {
        &self.white_average
    }

    #[must_use]
    pub fn dark_average(&self) -> &[u8] {
        &self.dark_average
    }

    /// Split into `(white_average, dark_average)`.
    #[must_use]
    pub fn into_averages(self) -> (Vec<u8>, Vec<u8>) {
        (self.white_average, self.dark_average)
    }
}

impl Codec for CalibrationBuffers {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()> {
        enc.put(&self.pixel_count)?;
        enc.put(&self.channel_count)?;
        enc.put(&self.average_size)?;
        enc.newline()?;
        enc.bytes(&self.white_average)?;
        enc.newline()?;
        enc.bytes(&self.dark_average)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let pixel_count = dec.take()?;
        let channel_count = dec.take()?;
        let average_size = dec.take()?;
        let position = dec.position();
        let white_average = dec.bytes()?;
        let dark_average = dec.bytes()?;

        Self::new(
            pixel_count,
            channel_count,
            average_size,
            white_average,
            dark_average,
        )
        .map_err(|e| DecodeError::InconsistentBuffers {
            position,
            average_size: e.average_size,
            white: e.white,
            dark: e.dark,
        })
    }
}

/// A single persisted calibration result.
///
/// Entries are never mutated in place: a new calibration produces a new entry.
/// Equality is structural across every field, including byte-exact buffers.
///
/// Fields are only set by [`CalibrationCacheEntry::new`] and by decoding, so
/// the timestamp always holds whole seconds and survives a round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationCacheEntry {
    fingerprint: SetupFingerprint,
    timestamp: DateTime<Utc>,
    frontend: FrontendSnapshot,
    sensor: SensorSnapshot,
    buffers: CalibrationBuffers,
}

impl CalibrationCacheEntry {
    /// Create an entry; the timestamp is truncated to whole seconds as persisted.
    #[must_use]
    pub fn new(
        fingerprint: SetupFingerprint,
        live: LiveConfig,
        buffers: CalibrationBuffers,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            fingerprint,
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            frontend: live.frontend,
            sensor: live.sensor,
            buffers,
        }
    }

    /// Setup the calibration was computed for.
    #[must_use]
    pub fn fingerprint(&self) -> &SetupFingerprint {
        &self.fingerprint
    }

    /// Calibration completion time, whole seconds.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn frontend(&self) -> &FrontendSnapshot {
        &self.frontend
    }

    #[must_use]
    pub fn sensor(&self) -> &SensorSnapshot {
        &self.sensor
    }

    #[must_use]
    pub fn buffers(&self) -> &CalibrationBuffers {
        &self.buffers
    }

    /// The hardware state the calibration was computed under.
    #[must_use]
    pub fn live_config(&self) -> LiveConfig {
        LiveConfig::new(self.frontend.clone(), self.sensor.clone())
    }

    /// True if this entry was computed for exactly this setup and hardware state.
    ///
    /// A single differing field in the fingerprint or either snapshot rejects
    /// the entry.
    #[must_use]
    pub fn is_usable_for(&self, fingerprint: &SetupFingerprint, live: &LiveConfig) -> bool {
        self.fingerprint == *fingerprint
            && self.frontend == live.frontend
            && self.sensor == live.sensor
    }

    /// Time elapsed since calibration, relative to `now`.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.timestamp)
    }
}

impl Codec for CalibrationCacheEntry {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()> {
        enc.put(&self.fingerprint)?;
        enc.newline()?;
        enc.put(&self.timestamp.timestamp())?;
        enc.newline()?;
        enc.put(&self.frontend)?;
        enc.newline()?;
        enc.put(&self.sensor)?;
        enc.newline()?;
        enc.put(&self.buffers)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let fingerprint = dec.take()?;
        let seconds: i64 = dec.take()?;
        let timestamp =
            DateTime::from_timestamp(seconds, 0).ok_or_else(|| dec.invalid_timestamp(seconds))?;

        Ok(Self {
            fingerprint,
            timestamp,
            frontend: dec.take()?,
            sensor: dec.take()?,
            buffers: dec.take()?,
        })
    }
}
