//! Pluggable persistence for calibration stores.
//!
//! [`CalibrationCache`] pairs a [`CalibrationStore`] with a [`CacheStorage`]
//! backend. Opening is resilient by default: a store that cannot be read or
//! decoded is logged and replaced by an empty one, so the scan session falls
//! back to recalibrating instead of failing.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;

use crate::cache::entry::CalibrationBuffers;
use crate::cache::setup::{LiveConfig, SetupFingerprint};
use crate::cache::store::{CalibrationStore, ExpiryPolicy, StoreResult};

/// File extension for persisted calibration stores.
pub const STORE_EXTENSION: &str = "cal";

/// Byte-level backend a calibration store is persisted to.
pub trait CacheStorage {
    /// Read the persisted bytes, or `None` if nothing has been persisted yet.
    fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replace the persisted bytes.
    fn write(&mut self, data: &[u8]) -> io::Result<()>;

    /// Short description for log messages.
    fn describe(&self) -> String;
}

/// Store persisted to a single file.
///
/// Writes go to a sibling temporary file that is then renamed over the target,
/// so readers never observe a partially written store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage for `device` inside `dir`.
    pub fn in_dir(dir: &Path, device: &str) -> Self {
        Self::new(dir.join(format!("{device}.{STORE_EXTENSION}")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl CacheStorage for FileStorage {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp = self.temp_path();
        {
            let mut file = File::create(&temp)?;
            file.write_all(data)?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Store held in memory, for tests and hosts that persist elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    data: Option<Vec<u8>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `data`.
    #[must_use]
    pub fn with_contents(data: Vec<u8>) -> Self {
        Self { data: Some(data) }
    }

    #[must_use]
    pub fn contents(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }
}

impl CacheStorage for MemoryStorage {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.data.clone())
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.data = Some(data.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}

/// Platform cache directory for calibration stores.
pub fn default_cache_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("org", "calcache", "calcache")
        .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
    Ok(project_dirs.cache_dir().join("calibration"))
}

/// How the persisted store was handled when the cache was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing had been persisted yet.
    Missing,
    /// The store decoded successfully.
    Loaded { entries: usize },
    /// The store could not be read or decoded and was treated as empty.
    Discarded { reason: String },
}

/// A device's calibration store bound to its persistence backend.
pub struct CalibrationCache<S: CacheStorage> {
    storage: S,
    store: CalibrationStore,
    outcome: LoadOutcome,
    dirty: bool,
}

impl<S: CacheStorage> CalibrationCache<S> {
    /// Open the cache, treating an unreadable or corrupt store as empty.
    pub fn open(storage: S, policy: ExpiryPolicy) -> Self {
        match Self::read_store(&storage, policy) {
            Ok((store, outcome)) => Self::from_parts(storage, store, outcome),
            Err(e) => {
                log::warn!(
                    "Discarding calibration cache {}, recalibration required: {}",
                    storage.describe(),
                    e
                );
                let outcome = LoadOutcome::Discarded {
                    reason: e.to_string(),
                };
                Self::from_parts(storage, CalibrationStore::with_policy(policy), outcome)
            }
        }
    }

    /// Open the cache, returning any read or decode failure.
    pub fn try_open(storage: S, policy: ExpiryPolicy) -> StoreResult<Self> {
        let (store, outcome) = Self::read_store(&storage, policy)?;
        Ok(Self::from_parts(storage, store, outcome))
    }

    fn read_store(
        storage: &S,
        policy: ExpiryPolicy,
    ) -> StoreResult<(CalibrationStore, LoadOutcome)> {
        match storage.read()? {
            Some(data) => {
                let store = CalibrationStore::load(&data, policy)?;
                log::debug!(
                    "Loaded {} calibration entries from {}",
                    store.len(),
                    storage.describe()
                );
                let outcome = LoadOutcome::Loaded {
                    entries: store.len(),
                };
                Ok((store, outcome))
            }
            None => Ok((CalibrationStore::with_policy(policy), LoadOutcome::Missing)),
        }
    }

    fn from_parts(storage: S, store: CalibrationStore, outcome: LoadOutcome) -> Self {
        Self {
            storage,
            store,
            outcome,
            dirty: false,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    #[must_use]
    pub fn store(&self) -> &CalibrationStore {
        &self.store
    }

    /// Mutable access to the store; marks the cache as needing a save.
    pub fn store_mut(&mut self) -> &mut CalibrationStore {
        self.dirty = true;
        &mut self.store
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// True if the store changed since it was opened or last saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Calibration buffers for this setup, or `None` if the device must recalibrate.
    #[must_use]
    pub fn lookup(
        &self,
        fingerprint: &SetupFingerprint,
        live: &LiveConfig,
    ) -> Option<&CalibrationBuffers> {
        self.store.lookup(fingerprint, live)
    }

    /// Record a fresh calibration, replacing older entries for the same setup.
    pub fn record(
        &mut self,
        fingerprint: SetupFingerprint,
        live: LiveConfig,
        buffers: CalibrationBuffers,
        timestamp: DateTime<Utc>,
    ) {
        self.store.record(fingerprint, live, buffers, timestamp);
        self.dirty = true;
    }

    /// Persist the store to the backend.
    pub fn save(&mut self) -> StoreResult<()> {
        let data = self.store.to_bytes()?;
        self.storage.write(&data)?;
        self.dirty = false;
        log::debug!(
            "Saved {} calibration entries to {}",
            self.store.len(),
            self.storage.describe()
        );
        Ok(())
    }

    /// Split into the backend and the store.
    pub fn into_parts(self) -> (S, CalibrationStore) {
        (self.storage, self.store)
    }
}
