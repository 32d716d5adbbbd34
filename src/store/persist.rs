//! Atomic JSON file operations for the countdown record and quote pool.
//!
//! Writes go temp file, fsync, rename so a concurrent reader (or a crash
//! mid-write) never sees a partially written record.

use crate::error::{ClockError, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use super::record::ClockConfig;

/// Read and validate the countdown record.
///
/// # Errors
/// - [`ClockError::ConfigMissing`] if the file does not exist.
/// - [`ClockError::ConfigCorrupt`] if it cannot be read, parsed, or validated.
pub fn read_config(path: &Path) -> Result<ClockConfig> {
    let bytes = read_bytes(path)?;
    let config: ClockConfig = serde_json::from_slice(&bytes).map_err(|e| {
        ClockError::ConfigCorrupt(format!(
            "failed to parse config file '{}': {e}",
            path.display()
        ))
    })?;
    config.validate().map_err(|e| {
        ClockError::ConfigCorrupt(format!(
            "config file '{}' failed validation: {e}",
            path.display()
        ))
    })?;
    Ok(config)
}

/// Read the quote list.
///
/// # Errors
/// - [`ClockError::ConfigMissing`] if the file does not exist.
/// - [`ClockError::ConfigCorrupt`] if it is not a JSON array of strings.
pub fn read_quotes(path: &Path) -> Result<Vec<String>> {
    let bytes = read_bytes(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        ClockError::ConfigCorrupt(format!(
            "failed to parse quotes file '{}': {e}",
            path.display()
        ))
    })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ClockError::ConfigMissing(path.display().to_string()))
        }
        Err(e) => Err(ClockError::ConfigCorrupt(format!(
            "failed to read '{}': {e}",
            path.display()
        ))),
    }
}

/// Write the countdown record atomically.
///
/// # Errors
/// Returns [`ClockError::ConfigWriteFailed`] on serialization, write, or rename failure.
pub fn write_config_atomic(path: &Path, config: &ClockConfig) -> Result<()> {
    write_json_atomic(path, config)
}

/// Write the quote list atomically.
///
/// # Errors
/// Returns [`ClockError::ConfigWriteFailed`] on serialization, write, or rename failure.
pub fn write_quotes_atomic(path: &Path, quotes: &[String]) -> Result<()> {
    write_json_atomic(path, quotes)
}

/// Serialize `value` as pretty JSON and write it atomically.
///
/// The temp file gets a unique name in the target directory, so concurrent
/// writers (even from other processes) never share or truncate each other's
/// staging file.
///
/// # Errors
/// Returns [`ClockError::ConfigWriteFailed`] on any failure.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ClockError::ConfigWriteFailed(format!("failed to serialize: {e}")))?;

    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClockError::ConfigWriteFailed(format!(
                    "failed to create directory '{}': {e}",
                    parent.display()
                ))
            })?;
            parent
        }
        None => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".lifeclock-")
        .suffix(".json.tmp")
        .tempfile_in(parent)
        .map_err(|e| {
            ClockError::ConfigWriteFailed(format!(
                "failed to create temp file in '{}': {e}",
                parent.display()
            ))
        })?;

    tmp.write_all(json.as_bytes())
        .map_err(|e| ClockError::ConfigWriteFailed(format!("failed to write temp file: {e}")))?;

    tmp.as_file()
        .sync_all()
        .map_err(|e| ClockError::ConfigWriteFailed(format!("failed to sync temp file: {e}")))?;

    tmp.persist(path).map_err(|e| {
        ClockError::ConfigWriteFailed(format!(
            "failed to move temp file to '{}': {}",
            path.display(),
            e.error
        ))
    })?;
    Ok(())
}
