//! Application configuration management.
//!
//! Settings are layered with `figment`, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. The TOML config file (platform config directory or `--config`)
//! 3. `CALCACHE_*` environment variables
//!
//! Command-line flags are applied on top by the command handlers.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::storage::default_cache_dir;
use crate::cache::{ExpiryPolicy, FileStorage};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "CALCACHE_";

/// Default calibration lifetime in minutes.
pub const DEFAULT_EXPIRATION_MINUTES: u64 = 60;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding per-device calibration stores.
    ///
    /// Falls back to the platform cache directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Minutes a flatbed calibration stays valid; `0` disables expiry.
    pub expiration_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: None,
            expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Errors are logged and the defaults are used instead.
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from_path(path),
            Err(e) => {
                log::debug!("Failed to locate config file, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load the configuration from `path`, falling back to defaults on error.
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load_from_path(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(
                    "Failed to load config from {}, using defaults: {:#}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Load the configuration from `path`, returning any parse error.
    ///
    /// A missing file is not an error; defaults and environment overrides
    /// still apply.
    pub fn try_load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Expiry policy derived from `expiration_minutes`.
    #[must_use]
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::from_minutes(self.expiration_minutes)
    }

    /// Directory holding calibration stores.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_cache_dir(),
        }
    }

    /// File storage for the named device.
    pub fn storage_for(&self, device: &str) -> Result<FileStorage> {
        Ok(FileStorage::in_dir(&self.cache_dir()?, device))
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Save the configuration as TOML to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("org", "calcache", "calcache")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}
