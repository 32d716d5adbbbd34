//! Settings operation end to end.

use chrono::NaiveDate;
use lifeclock::countdown::life_end_instant;
use lifeclock::store::persist::read_config;
use lifeclock::{
    ClockConfig, ClockError, ConfigStore, QuotePool, QuoteRotationScheduler, RotationOutcome,
    SettingsInput, TriggerTime, apply_settings, compute_frame,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::helpers::{at, temp_store};

#[test]
fn rejected_input_leaves_disk_and_memory_alone() {
    let (store, _dir) = temp_store();
    let before = std::fs::read(&store.paths().config).unwrap();

    let bad_inputs = [
        SettingsInput {
            life_expectancy_years: Some("-5".to_owned()),
            ..SettingsInput::default()
        },
        SettingsInput {
            birth_date: Some("1990-13-01".to_owned()),
            theme_name: Some("Never saved".to_owned()),
            ..SettingsInput::default()
        },
        SettingsInput {
            theme_end_date: Some("tomorrow".to_owned()),
            ..SettingsInput::default()
        },
    ];

    for input in &bad_inputs {
        let result = apply_settings(&store, input);
        assert!(
            matches!(result, Err(ClockError::InvalidSettingsInput(_))),
            "{input:?} should be rejected"
        );
    }

    assert_eq!(std::fs::read(&store.paths().config).unwrap(), before);
    assert_eq!(store.snapshot(), ClockConfig::default());
}

#[test]
fn accepted_input_survives_restart() {
    let (store, _dir) = temp_store();
    let input = SettingsInput {
        birth_date: Some("2001-09-09".to_owned()),
        life_expectancy_years: Some("88".to_owned()),
        theme_name: Some("Graduation".to_owned()),
        theme_end_date: Some("2026-06-15".to_owned()),
    };
    let targets = apply_settings(&store, &input).unwrap();

    let birth = NaiveDate::from_ymd_opt(2001, 9, 9).unwrap();
    assert_eq!(Some(targets.life_end), life_end_instant(birth, 88));

    let on_disk = read_config(&store.paths().config).unwrap();
    assert_eq!(on_disk.birth_date, birth);
    assert_eq!(on_disk.life_expectancy_years, 88);
    assert_eq!(on_disk.theme_name, "Graduation");
    assert_eq!(
        on_disk.theme_end_date,
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    );
}

#[test]
fn settings_from_a_second_process_reach_the_running_clock() {
    let (running, _dir) = temp_store();
    let mut scheduler = QuoteRotationScheduler::new(
        Arc::clone(&running),
        QuotePool::seed(),
        TriggerTime::default(),
        CancellationToken::new(),
    )
    .with_seed(9);
    assert!(matches!(
        scheduler.poll_at(at("2024-06-01T04:00:00")),
        RotationOutcome::Rotated { .. }
    ));

    // The `set` subcommand opens its own store on the same files.
    let cli = ConfigStore::open(running.paths().clone());
    let input = SettingsInput {
        theme_name: Some("Wedding".to_owned()),
        ..SettingsInput::default()
    };
    apply_settings(&cli, &input).unwrap();

    assert!(running.reload_if_changed());
    let frame = compute_frame(&running.snapshot(), at("2024-06-01T12:00:00"));
    assert_eq!(frame.theme_title_text, "🎯 WEDDING COUNTDOWN 🎯");

    assert!(matches!(
        scheduler.poll_at(at("2024-06-02T04:00:00")),
        RotationOutcome::Rotated { .. }
    ));
    let on_disk = read_config(&running.paths().config).unwrap();
    assert_eq!(on_disk.theme_name, "Wedding");
    assert_eq!(on_disk.last_quote_update, NaiveDate::from_ymd_opt(2024, 6, 2));
}
