//! Config Store self-healing and on-disk format.

use lifeclock::store::persist::{read_config, read_quotes};
use lifeclock::{ClockConfig, ConfigStore, QuotePool, StorePaths};

use crate::helpers::temp_store;

#[test]
fn first_run_writes_both_files() {
    let (store, _dir) = temp_store();
    let pool = store.load_quote_pool();

    assert_eq!(read_config(&store.paths().config).unwrap(), ClockConfig::default());
    assert_eq!(read_quotes(&store.paths().quotes).unwrap().len(), pool.len());
    assert_eq!(pool, QuotePool::seed());
}

#[test]
fn on_disk_record_has_exactly_the_six_fields() {
    let (store, _dir) = temp_store();
    let raw = std::fs::read_to_string(&store.paths().config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        [
            "birth_date",
            "current_quote",
            "last_quote_update",
            "life_expectancy_years",
            "theme_end_date",
            "theme_name",
        ]
    );
    assert_eq!(value["last_quote_update"], "");
}

#[test]
fn file_written_by_hand_is_loaded_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let paths = StorePaths::in_dir(dir.path());
    std::fs::write(
        &paths.config,
        r#"{
  "birth_date": "1988-08-08",
  "life_expectancy_years": 84,
  "theme_name": "Summit",
  "theme_end_date": "2026-07-01",
  "last_quote_update": "2024-05-31",
  "current_quote": "Dukkha"
}"#,
    )
    .unwrap();
    std::fs::write(&paths.quotes, r#"["one", "two"]"#).unwrap();

    let store = ConfigStore::open(paths);
    let config = store.snapshot();
    assert_eq!(config.theme_name, "Summit");
    assert_eq!(config.life_expectancy_years, 84);
    assert_eq!(config.last_quote_update.unwrap().to_string(), "2024-05-31");
    assert_eq!(store.load_quote_pool().as_slice(), ["one", "two"]);
}

#[test]
fn corrupt_record_is_replaced_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let paths = StorePaths::in_dir(dir.path());

    for garbage in [
        "",
        "null",
        "[]",
        r#"{"birth_date": "not a date", "life_expectancy_years": 80, "theme_name": "x", "theme_end_date": "2025-12-31", "last_quote_update": "", "current_quote": "q"}"#,
        r#"{"birth_date": "1990-01-01", "life_expectancy_years": 0, "theme_name": "x", "theme_end_date": "2025-12-31", "last_quote_update": "", "current_quote": "q"}"#,
    ] {
        std::fs::write(&paths.config, garbage).unwrap();
        let store = ConfigStore::open(paths.clone());
        assert_eq!(store.snapshot(), ClockConfig::default(), "input: {garbage:?}");
        assert_eq!(read_config(&paths.config).unwrap(), ClockConfig::default());
    }
}

#[test]
fn reload_picks_up_external_edit() {
    let (store, _dir) = temp_store();
    let edited = ClockConfig {
        theme_name: "Edited elsewhere".to_owned(),
        ..ClockConfig::default()
    };
    lifeclock::store::persist::write_config_atomic(&store.paths().config, &edited).unwrap();

    assert_eq!(store.snapshot().theme_name, "Next Vacation");
    assert_eq!(store.load().theme_name, "Edited elsewhere");
    assert_eq!(store.snapshot().theme_name, "Edited elsewhere");
}
