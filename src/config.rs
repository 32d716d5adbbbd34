//! Application settings for the countdown appliance.
//!
//! These are operator knobs (trigger time, cadences, file locations) read
//! from an optional `lifeclock.toml`. They are separate from the countdown
//! record itself, which lives in [`crate::store`].

use crate::error::{ClockError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default quote-rotation poll interval in seconds.
pub const DEFAULT_ROTATION_POLL_SECS: u64 = 60;

/// Default display refresh period in milliseconds.
pub const DEFAULT_REFRESH_PERIOD_MS: u64 = 1000;

/// Top-level application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Local wall-clock time at which the daily quote rotates.
    pub trigger: TriggerTime,
    /// Seconds between quote-rotation polls.
    pub rotation_poll_secs: u64,
    /// Milliseconds between display refresh ticks.
    pub refresh_period_ms: u64,
    /// Countdown record path (None = `clock_dirs::config_file()`).
    pub config_path: Option<PathBuf>,
    /// Quote pool path (None = `clock_dirs::quotes_file()`).
    pub quotes_path: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            trigger: TriggerTime::default(),
            rotation_poll_secs: DEFAULT_ROTATION_POLL_SECS,
            refresh_period_ms: DEFAULT_REFRESH_PERIOD_MS,
            config_path: None,
            quotes_path: None,
        }
    }
}

/// Hour and minute of day at which rotation becomes eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerTime {
    /// Hour of day (0-23, local time).
    pub hour: u32,
    /// Minute of hour (0-59).
    pub minute: u32,
}

impl Default for TriggerTime {
    fn default() -> Self {
        Self { hour: 4, minute: 0 }
    }
}

impl TriggerTime {
    /// Create a validated trigger time.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::AppSettings`] when the hour or minute is out of range.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        let trigger = Self { hour, minute };
        trigger.validate()?;
        Ok(trigger)
    }

    fn validate(&self) -> Result<()> {
        if self.hour > 23 || self.minute > 59 {
            return Err(ClockError::AppSettings(format!(
                "trigger time {:02}:{:02} is out of range",
                self.hour, self.minute
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for TriggerTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl AppSettings {
    /// Load settings from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self =
            toml::from_str(&content).map_err(|e| ClockError::AppSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path` if it exists, otherwise use defaults.
    ///
    /// An unreadable or invalid file is logged and replaced by defaults; the
    /// appliance keeps running.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no app settings file, using defaults");
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), "ignoring app settings: {e}");
                Self::default()
            }
        }
    }

    /// Save settings to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the settings cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ClockError::AppSettings(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::AppSettings`] for an invalid trigger, a zero refresh
    /// period, or a rotation poll outside 1..=60 seconds.
    pub fn validate(&self) -> Result<()> {
        self.trigger.validate()?;
        if !(1..=60).contains(&self.rotation_poll_secs) {
            // Longer polls can step over the trigger minute entirely.
            return Err(ClockError::AppSettings(format!(
                "rotation_poll_secs must be between 1 and 60, got {}",
                self.rotation_poll_secs
            )));
        }
        if self.refresh_period_ms == 0 {
            return Err(ClockError::AppSettings(
                "refresh_period_ms must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// Resolved countdown record path.
    pub fn config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(crate::clock_dirs::config_file)
    }

    /// Resolved quote pool path.
    pub fn quotes_path(&self) -> PathBuf {
        self.quotes_path
            .clone()
            .unwrap_or_else(crate::clock_dirs::quotes_file)
    }

    /// Poll interval for the rotation scheduler.
    pub fn rotation_poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.rotation_poll_secs)
    }

    /// Tick period for the refresh cadence.
    pub fn refresh_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.refresh_period_ms)
    }
}
