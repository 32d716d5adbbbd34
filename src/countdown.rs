//! Countdown calculator.
//!
//! Pure functions from `(target, now)` to display text, plus the derived
//! countdown targets for a [`ClockConfig`].
//!
//! Two year lengths are in play: the life end is computed with 365.25-day
//! years, while the "years" bucket of the displayed breakdown uses 365-day
//! years. Both are intentional and kept separate.

use crate::store::ClockConfig;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::sync::Arc;
use tracing::warn;

/// Text shown once a countdown target has passed.
pub const EXPIRED_TEXT: &str = "⚠️ TIME'S UP! ⚠️";

/// Seconds in a 365.25-day year, used for the life-expectancy span.
pub const SECONDS_PER_LIFE_YEAR: i64 = 31_557_600;

/// Days per "year" in the displayed breakdown.
pub const DAYS_PER_DISPLAY_YEAR: i64 = 365;

const SECONDS_PER_DAY: i64 = 86_400;

/// Life end used when the configured span overflows the calendar.
const FALLBACK_LIFE_DAYS: i64 = 365 * 30;

/// Source of "now" for the background loops. Local wall-clock time in production.
pub type WallClock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Current local wall-clock time.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// The production [`WallClock`].
pub fn system_clock() -> WallClock {
    Arc::new(local_now)
}

/// Format the time remaining until `target` as seen at `now`.
///
/// Returns [`EXPIRED_TEXT`] when `target <= now`. Otherwise
/// `"{Y}Y {D}D {HH}:{MM}:{SS}"`, dropping the `Y` part when it is zero.
/// Sub-second remainders are truncated.
pub fn format_remaining(target: NaiveDateTime, now: NaiveDateTime) -> String {
    if target <= now {
        return EXPIRED_TEXT.to_owned();
    }

    let total_secs = (target - now).num_seconds();
    let whole_days = total_secs / SECONDS_PER_DAY;
    let day_secs = total_secs % SECONDS_PER_DAY;

    let years = whole_days / DAYS_PER_DISPLAY_YEAR;
    let days = whole_days % DAYS_PER_DISPLAY_YEAR;
    let hours = day_secs / 3600;
    let minutes = (day_secs % 3600) / 60;
    let seconds = day_secs % 60;

    if years > 0 {
        format!("{years}Y {days}D {hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{days}D {hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// `birth` at midnight plus `years * 365.25` days.
///
/// Returns `None` if the result falls outside the representable calendar.
pub fn life_end_instant(birth: NaiveDate, years: u32) -> Option<NaiveDateTime> {
    let span = TimeDelta::try_seconds(i64::from(years) * SECONDS_PER_LIFE_YEAR)?;
    birth.and_time(NaiveTime::default()).checked_add_signed(span)
}

/// The themed countdown ends at midnight starting `date`.
pub fn theme_end_instant(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Derived, never-persisted countdown targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTargets {
    /// End of the life-expectancy countdown.
    pub life_end: NaiveDateTime,
    /// End of the themed countdown.
    pub theme_end: NaiveDateTime,
}

impl CountdownTargets {
    /// Compute both targets from a configuration snapshot.
    ///
    /// If the life end overflows, falls back to thirty 365-day years after `now`.
    pub fn from_config(config: &ClockConfig, now: NaiveDateTime) -> Self {
        let life_end = life_end_instant(config.birth_date, config.life_expectancy_years)
            .unwrap_or_else(|| {
                warn!(
                    birth_date = %config.birth_date,
                    years = config.life_expectancy_years,
                    "life end out of range, using fallback"
                );
                now.checked_add_signed(TimeDelta::days(FALLBACK_LIFE_DAYS))
                    .unwrap_or(NaiveDateTime::MAX)
            });

        Self {
            life_end,
            theme_end: theme_end_instant(config.theme_end_date),
        }
    }

    /// Life countdown text at `now`.
    pub fn life_text(&self, now: NaiveDateTime) -> String {
        format_remaining(self.life_end, now)
    }

    /// Theme countdown text at `now`.
    pub fn theme_text(&self, now: NaiveDateTime) -> String {
        format_remaining(self.theme_end, now)
    }
}
