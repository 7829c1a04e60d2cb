//! Shading calibration cache.
//!
//! This module persists calibration results so that repeated scans with an
//! unchanged hardware configuration can skip the shading calibration pass.
//!
//! # Architecture
//!
//! * [`setup`]: The setup fingerprint and hardware snapshots an entry is matched on.
//! * [`entry`]: The persisted entry model and its validation logic.
//! * [`store`]: Ordered in-memory store, lookup, eviction and the persisted format.
//! * [`storage`]: File and in-memory backends plus the resilient open/save wrapper.
//!
//! # Cache Validation
//!
//! An entry is reused only if all of these match exactly:
//! * The setup fingerprint (device identifiers, scan parameters, derived setup)
//! * The analog front-end snapshot (gain, offset, registers)
//! * The sensor snapshot (exposure, geometry, custom registers)
//!
//! Flatbed entries on devices that are not sheet-fed additionally expire after
//! the configured expiration time. A miss is not an error: the caller
//! recalibrates and records the new result.

pub mod entry;
pub mod setup;
pub mod storage;
pub mod store;

pub use entry::{BufferSizeMismatch, CalibrationBuffers, CalibrationCacheEntry};
pub use setup::{
    CurrentSetup, DeviceIds, FrontendSnapshot, LiveConfig, RegisterSetting, SensorSnapshot,
    SetupFingerprint, SetupParams,
};
pub use storage::{CacheStorage, CalibrationCache, FileStorage, LoadOutcome, MemoryStorage};
pub use store::{CalibrationStore, ExpiryPolicy, StoreError, StoreResult, FORMAT_VERSION};
