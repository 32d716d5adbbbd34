//! The single serializing owner of the countdown record.
//!
//! Provides a thread-safe store that:
//! - Self-heals missing or corrupt files by writing defaults
//! - Serializes every write behind one writer lock
//! - Hands readers point-in-time snapshots without waiting on disk I/O
//! - Keeps the in-memory record authoritative when a write fails
//!
//! Other processes (the `set` and `new-quote` commands) may write the same
//! file. [`ConfigStore::update`] therefore starts from the record on disk, and
//! [`ConfigStore::reload_if_changed`] lets readers pick up such writes.

use crate::config::AppSettings;
use crate::error::{ClockError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, TryLockError};
use std::time::SystemTime;
use tracing::{debug, error, info, warn};

use super::persist::{read_config, read_quotes, write_config_atomic, write_quotes_atomic};
use super::record::{ClockConfig, QuotePool};

/// Locations of the two persisted files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    /// Countdown record (`countdown_config.json`).
    pub config: PathBuf,
    /// Quote pool (`daily_quotes.json`).
    pub quotes: PathBuf,
}

impl StorePaths {
    /// Explicit paths.
    pub fn new(config: impl Into<PathBuf>, quotes: impl Into<PathBuf>) -> Self {
        Self {
            config: config.into(),
            quotes: quotes.into(),
        }
    }

    /// Both files under `dir` with their standard names.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(
            dir.join(crate::clock_dirs::CONFIG_FILE_NAME),
            dir.join(crate::clock_dirs::QUOTES_FILE_NAME),
        )
    }

    /// Paths resolved from application settings.
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(settings.config_path(), settings.quotes_path())
    }
}

/// Identity of the record file as last inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: SystemTime,
    len: u64,
}

impl FileStamp {
    fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        Some(Self {
            modified: meta.modified().ok()?,
            len: meta.len(),
        })
    }
}

/// What the store knows about the file. Guarded by the writer lock.
#[derive(Debug, Default)]
struct DiskState {
    /// Stamp of the file when it was last checked for outside changes.
    stamp: Option<FileStamp>,
    /// The last write failed, so the cache is ahead of the file and outside
    /// changes are not pulled in until a write succeeds.
    unsaved: bool,
}

/// Shared owner of the countdown record.
///
/// Wrap in an `Arc` to share between the refresh cadence, the rotation
/// scheduler and the settings operation.
pub struct ConfigStore {
    paths: StorePaths,
    cache: RwLock<ClockConfig>,
    writer: Mutex<DiskState>,
}

impl ConfigStore {
    /// Create a store for `paths` and load the record from disk.
    pub fn open(paths: StorePaths) -> Self {
        let store = Self {
            paths,
            cache: RwLock::new(ClockConfig::default()),
            writer: Mutex::new(DiskState::default()),
        };
        store.load();
        store
    }

    /// File locations backing this store.
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Re-read the record from disk and cache it.
    ///
    /// A missing, unreadable or invalid file is replaced by
    /// [`ClockConfig::default`], which is persisted immediately. Never fails.
    pub fn load(&self) -> ClockConfig {
        let mut disk = self.lock_writer();
        *disk = DiskState::default();
        let config = match read_config(&self.paths.config) {
            Ok(config) => {
                debug!(path = %self.paths.config.display(), "loaded countdown config");
                config
            }
            Err(ClockError::ConfigMissing(_)) => {
                info!(
                    path = %self.paths.config.display(),
                    "no countdown config yet, writing defaults"
                );
                self.persist_default_config(&mut disk)
            }
            Err(e) => {
                warn!("countdown config unusable, replacing with defaults: {e}");
                self.persist_default_config(&mut disk)
            }
        };
        self.replace_cache(config.clone());
        config
    }

    /// Point-in-time copy of the current record.
    pub fn snapshot(&self) -> ClockConfig {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Pull in a record written by someone else since the last check.
    ///
    /// Cheap when nothing changed (one `stat`). Never waits for a writer: if a
    /// write is in progress the check is skipped, since that writer refreshes
    /// the cache itself. A corrupt or missing file is ignored and the cached
    /// record kept. Returns whether the cache changed.
    pub fn reload_if_changed(&self) -> bool {
        let mut disk = match self.writer.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return false,
        };
        if disk.unsaved {
            return false;
        }
        let stamp = FileStamp::of(&self.paths.config);
        if stamp.is_none() || stamp == disk.stamp {
            return false;
        }
        self.pull_from_disk(&mut disk, stamp)
    }

    /// Replace the whole record and persist it atomically.
    ///
    /// # Errors
    /// - [`ClockError::InvalidSettingsInput`] if the record fails validation;
    ///   nothing is changed.
    /// - [`ClockError::ConfigWriteFailed`] if the disk write fails; the
    ///   in-memory record is still replaced.
    pub fn save(&self, config: ClockConfig) -> Result<()> {
        config.validate()?;
        let mut disk = self.lock_writer();
        self.commit(&mut disk, config)
    }

    /// Read-modify-write the record as one serialized step.
    ///
    /// The closure sees the latest committed record, including one written to
    /// disk by another process. Returns the new record.
    ///
    /// # Errors
    /// Same as [`save`](Self::save).
    pub fn update<F>(&self, f: F) -> Result<ClockConfig>
    where
        F: FnOnce(&mut ClockConfig),
    {
        let mut disk = self.lock_writer();
        if !disk.unsaved {
            let stamp = FileStamp::of(&self.paths.config);
            self.pull_from_disk(&mut disk, stamp);
        }
        let mut config = self.snapshot();
        f(&mut config);
        config.validate()?;
        self.commit(&mut disk, config.clone())?;
        Ok(config)
    }

    /// Load the quote pool, seeding it on first run or when the file is corrupt.
    ///
    /// A valid but empty list is kept; rotation then skips with
    /// [`ClockError::QuotePoolEmpty`].
    pub fn load_quote_pool(&self) -> QuotePool {
        match read_quotes(&self.paths.quotes) {
            Ok(quotes) => {
                if quotes.is_empty() {
                    warn!(path = %self.paths.quotes.display(), "quote pool is empty");
                }
                debug!(count = quotes.len(), "loaded quote pool");
                QuotePool::new(quotes)
            }
            Err(ClockError::ConfigMissing(_)) => {
                info!(
                    path = %self.paths.quotes.display(),
                    "no quote pool yet, writing seed quotes"
                );
                self.persist_seed_quotes()
            }
            Err(e) => {
                warn!("quote pool unusable, replacing with seed quotes: {e}");
                self.persist_seed_quotes()
            }
        }
    }

    /// Adopt the on-disk record if it is valid and differs from the cache.
    fn pull_from_disk(&self, disk: &mut DiskState, stamp: Option<FileStamp>) -> bool {
        disk.stamp = stamp;
        match read_config(&self.paths.config) {
            Ok(config) => {
                if *self.cache.read().unwrap_or_else(PoisonError::into_inner) == config {
                    return false;
                }
                info!(
                    path = %self.paths.config.display(),
                    "countdown config changed on disk, reloading"
                );
                self.replace_cache(config);
                true
            }
            Err(ClockError::ConfigMissing(_)) => false,
            Err(e) => {
                warn!("ignoring unusable countdown config on disk: {e}");
                false
            }
        }
    }

    fn commit(&self, disk: &mut DiskState, config: ClockConfig) -> Result<()> {
        let written = write_config_atomic(&self.paths.config, &config);
        self.replace_cache(config);
        disk.unsaved = written.is_err();
        if let Err(e) = &written {
            error!("cannot persist countdown config, keeping in-memory record: {e}");
        }
        written
    }

    fn persist_default_config(&self, disk: &mut DiskState) -> ClockConfig {
        let config = ClockConfig::default();
        if let Err(e) = write_config_atomic(&self.paths.config, &config) {
            error!("cannot persist default countdown config: {e}");
            disk.unsaved = true;
        }
        config
    }

    fn persist_seed_quotes(&self) -> QuotePool {
        let pool = QuotePool::seed();
        if let Err(e) = write_quotes_atomic(&self.paths.quotes, pool.as_slice()) {
            error!("cannot persist seed quotes: {e}");
        }
        pool
    }

    fn replace_cache(&self, config: ClockConfig) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    fn lock_writer(&self) -> MutexGuard<'_, DiskState> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
