//! Countdown text as it reaches the display surface.

use lifeclock::{ClockConfig, ClockRuntime, DisplayFrame, EXPIRED_TEXT, compute_frame};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::helpers::{at, temp_settings};

#[test]
fn reference_life_countdown() {
    let frame = compute_frame(&ClockConfig::default(), at("2024-06-01T12:00:00"));
    assert_eq!(frame.life_countdown_text, "45Y 224D 12:00:00");
}

#[test]
fn countdown_ticks_down_one_second_at_a_time() {
    let config = ClockConfig::default();
    let a = compute_frame(&config, at("2024-06-01T12:00:00"));
    let b = compute_frame(&config, at("2024-06-01T12:00:01"));
    assert_eq!(a.life_countdown_text, "45Y 224D 12:00:00");
    assert_eq!(b.life_countdown_text, "45Y 224D 11:59:59");
}

#[test]
fn both_countdowns_expire_independently() {
    let config = ClockConfig::default();

    let theme_done = compute_frame(&config, at("2026-01-15T09:00:00"));
    assert_eq!(theme_done.theme_countdown_text, EXPIRED_TEXT);
    assert_ne!(theme_done.life_countdown_text, EXPIRED_TEXT);

    let all_done = compute_frame(&config, at("2070-01-01T00:00:00"));
    assert_eq!(all_done.life_countdown_text, EXPIRED_TEXT);
}

#[tokio::test]
async fn runtime_frames_reflect_the_persisted_record() {
    let dir = tempfile::tempdir().unwrap();
    let settings = temp_settings(&dir);
    let (tx, mut rx) = mpsc::unbounded_channel::<DisplayFrame>();

    let runtime = ClockRuntime::start(&settings, tx).await.unwrap();
    let frame = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();

    let config = runtime.store().snapshot();
    assert_eq!(frame.current_quote, config.current_quote);
    assert_eq!(frame.theme_title_text, "🎯 NEXT VACATION COUNTDOWN 🎯");

    runtime.shutdown().await;
}
