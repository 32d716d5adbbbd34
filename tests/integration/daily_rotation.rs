//! Quote rotation across simulated days.

use chrono::{NaiveDate, TimeDelta};
use lifeclock::rotation::MAX_PICK_ATTEMPTS;
use lifeclock::{
    QuotePool, QuoteRotationScheduler, RotationOutcome, SettingsInput, TriggerTime, apply_settings,
    rotate_now,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::helpers::{at, temp_store};

fn pool() -> QuotePool {
    QuotePool::new(vec!["A".to_owned(), "B".to_owned(), "C".to_owned()])
}

#[test]
fn minute_polls_over_a_week_rotate_once_per_day() {
    let (store, _dir) = temp_store();
    let mut scheduler = QuoteRotationScheduler::new(
        Arc::clone(&store),
        pool(),
        TriggerTime::default(),
        CancellationToken::new(),
    )
    .with_seed(2024);

    let start = at("2024-06-01T00:00:30");
    let mut rotations = Vec::new();
    for minute in 0..(7 * 24 * 60) {
        let now = start + TimeDelta::minutes(minute);
        if let RotationOutcome::Rotated { quote } = scheduler.poll_at(now) {
            rotations.push((now, quote));
        }
    }

    assert_eq!(rotations.len(), 7);
    for (day, (when, quote)) in rotations.iter().enumerate() {
        assert_eq!(when.date(), start.date() + TimeDelta::days(day as i64));
        assert_eq!(when.format("%H:%M").to_string(), "04:00");
        assert!(pool().contains(quote));
    }
    assert_eq!(
        store.snapshot().last_quote_update,
        NaiveDate::from_ymd_opt(2024, 6, 7)
    );
}

#[test]
fn consecutive_rotations_mostly_change_the_quote() {
    let (store, _dir) = temp_store();
    let two = QuotePool::new(vec!["A".to_owned(), "B".to_owned()]);
    let mut scheduler =
        QuoteRotationScheduler::new(Arc::clone(&store), two, TriggerTime::default(), CancellationToken::new())
            .with_seed(99);

    let mut previous = store.snapshot().current_quote;
    let mut repeats = 0;
    let days = 400;
    for day in 0..days {
        let now = at("2024-01-01T04:00:00") + TimeDelta::days(day);
        let RotationOutcome::Rotated { quote } = scheduler.poll_at(now) else {
            panic!("day {day} should rotate");
        };
        if quote == previous {
            repeats += 1;
        }
        previous = quote;
    }

    // A repeat needs every one of the attempts to land on the current quote.
    let expected = f64::from(days as u32) * 0.5_f64.powi(MAX_PICK_ATTEMPTS as i32);
    assert!(
        f64::from(repeats) < expected * 3.0 + 5.0,
        "{repeats} repeats in {days} rotations"
    );
}

#[test]
fn manual_rotation_does_not_consume_the_daily_slot() {
    let (store, _dir) = temp_store();
    let mut rng = StdRng::seed_from_u64(1);
    rotate_now(&store, &pool(), &mut rng).unwrap();

    let mut scheduler =
        QuoteRotationScheduler::new(Arc::clone(&store), pool(), TriggerTime::default(), CancellationToken::new());
    assert!(matches!(
        scheduler.poll_at(at("2024-06-01T04:00:00")),
        RotationOutcome::Rotated { .. }
    ));
}

#[test]
fn rotation_and_settings_writes_do_not_clobber_each_other() {
    let (store, _dir) = temp_store();
    let mut scheduler =
        QuoteRotationScheduler::new(Arc::clone(&store), pool(), TriggerTime::default(), CancellationToken::new());

    let settings_store = Arc::clone(&store);
    let writer = std::thread::spawn(move || {
        for i in 0..50 {
            let input = SettingsInput {
                theme_name: Some(format!("Theme {i}")),
                ..SettingsInput::default()
            };
            apply_settings(&settings_store, &input).unwrap();
        }
    });

    for day in 0..50 {
        let now = at("2024-06-01T04:00:00") + TimeDelta::days(day);
        assert!(matches!(
            scheduler.poll_at(now),
            RotationOutcome::Rotated { .. }
        ));
    }
    writer.join().unwrap();

    let config = store.snapshot();
    assert_eq!(config.theme_name, "Theme 49");
    assert_eq!(config.last_quote_update, NaiveDate::from_ymd_opt(2024, 7, 20));
    assert!(pool().contains(&config.current_quote));
}
