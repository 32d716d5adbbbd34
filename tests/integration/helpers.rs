//! Shared helpers for integration tests.

use chrono::NaiveDateTime;
use lifeclock::{AppSettings, ConfigStore, StorePaths};
use std::sync::Arc;

/// Parse `YYYY-MM-DDTHH:MM:SS`.
pub(crate) fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").expect("valid timestamp")
}

/// Open a store in a fresh temp dir. Returns `(store, tempdir)`.
pub(crate) fn temp_store() -> (Arc<ConfigStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = Arc::new(ConfigStore::open(StorePaths::in_dir(dir.path())));
    (store, dir)
}

/// App settings pointing both files into `dir`, with a fast refresh.
pub(crate) fn temp_settings(dir: &tempfile::TempDir) -> AppSettings {
    let paths = StorePaths::in_dir(dir.path());
    AppSettings {
        refresh_period_ms: 10,
        config_path: Some(paths.config),
        quotes_path: Some(paths.quotes),
        ..AppSettings::default()
    }
}
