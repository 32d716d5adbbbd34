//! Centralized filesystem paths for lifeclock.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/lifeclock/` | `~/.config/lifeclock/` |
//! | Data (logs) | `~/Library/Application Support/lifeclock/` | `~/.local/share/lifeclock/` |
//!
//! # Environment Overrides
//!
//! - `LIFECLOCK_CONFIG_DIR` overrides [`config_dir`]
//! - `LIFECLOCK_DATA_DIR` overrides [`data_dir`]

use std::path::PathBuf;

/// File name of the persisted countdown configuration record.
pub const CONFIG_FILE_NAME: &str = "countdown_config.json";

/// File name of the persisted quote pool.
pub const QUOTES_FILE_NAME: &str = "daily_quotes.json";

/// File name of the optional TOML application settings.
pub const SETTINGS_FILE_NAME: &str = "lifeclock.toml";

/// Application config directory.
///
/// Holds the countdown record, the quote pool and `lifeclock.toml`.
/// Resolves to `dirs::config_dir()/lifeclock/` unless `LIFECLOCK_CONFIG_DIR`
/// is set.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("LIFECLOCK_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("lifeclock"))
        .unwrap_or_else(|| PathBuf::from("/tmp/lifeclock-config"))
}

/// Application data directory. Override with `LIFECLOCK_DATA_DIR`.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("LIFECLOCK_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("lifeclock"))
        .unwrap_or_else(|| PathBuf::from("/tmp/lifeclock-data"))
}

/// Log file directory (`data_dir()/logs/`).
#[must_use]
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Countdown record path (`config_dir()/countdown_config.json`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Quote pool path (`config_dir()/daily_quotes.json`).
#[must_use]
pub fn quotes_file() -> PathBuf {
    config_dir().join(QUOTES_FILE_NAME)
}

/// Application settings path (`config_dir()/lifeclock.toml`).
#[must_use]
pub fn settings_file() -> PathBuf {
    config_dir().join(SETTINGS_FILE_NAME)
}
