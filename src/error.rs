//! Error types for the countdown core.

/// Top-level error type for the countdown and quote-rotation core.
///
/// None of these are fatal to the process: missing or corrupt files are
/// recovered with defaults, write failures are logged and the in-memory
/// record stays authoritative.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// A persisted file does not exist yet.
    #[error("config missing: {0}")]
    ConfigMissing(String),

    /// A persisted file is unreadable, unparseable or fails validation.
    #[error("config corrupt: {0}")]
    ConfigCorrupt(String),

    /// Persisting a record to disk failed.
    #[error("config write failed: {0}")]
    ConfigWriteFailed(String),

    /// User-supplied settings were rejected (bad date, non-positive expectancy).
    #[error("invalid settings: {0}")]
    InvalidSettingsInput(String),

    /// The quote pool has no entries to rotate through.
    #[error("quote pool is empty")]
    QuotePoolEmpty,

    /// Application settings (TOML) could not be read or written.
    #[error("app settings error: {0}")]
    AppSettings(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ClockError>;
