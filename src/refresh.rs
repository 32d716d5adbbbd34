//! Refresh cadence: the fast tick that feeds the display surface.
//!
//! Every period (1 s by default) the cadence snapshots the countdown record,
//! recomputes both countdowns against the wall clock and hands a
//! [`DisplayFrame`] to a [`DisplaySink`]. It only ever reads the store, so a
//! rotation or settings change shows up on the next tick. Each tick first
//! picks up a record rewritten by another process, such as the `set`
//! subcommand, via [`ConfigStore::reload_if_changed`].

use crate::config::DEFAULT_REFRESH_PERIOD_MS;
use crate::countdown::{CountdownTargets, WallClock, system_clock};
use crate::store::{ClockConfig, ConfigStore};
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Everything the display surface shows for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    /// Remaining life countdown, or the expired sentinel.
    pub life_countdown_text: String,
    /// Remaining theme countdown, or the expired sentinel.
    pub theme_countdown_text: String,
    /// Heading for the theme countdown.
    pub theme_title_text: String,
    /// Quote currently displayed.
    pub current_quote: String,
}

/// Receiver of display frames.
pub trait DisplaySink: Send + 'static {
    /// Deliver one frame. Returning `false` means the sink is gone and the
    /// cadence should stop.
    fn deliver(&mut self, frame: DisplayFrame) -> bool;
}

impl DisplaySink for mpsc::UnboundedSender<DisplayFrame> {
    fn deliver(&mut self, frame: DisplayFrame) -> bool {
        self.send(frame).is_ok()
    }
}

/// Heading shown above the theme countdown.
pub fn theme_title(theme_name: &str) -> String {
    format!("🎯 {} COUNTDOWN 🎯", theme_name.to_uppercase())
}

/// Build the frame for `config` at `now`.
pub fn compute_frame(config: &ClockConfig, now: NaiveDateTime) -> DisplayFrame {
    let targets = CountdownTargets::from_config(config, now);
    DisplayFrame {
        life_countdown_text: targets.life_text(now),
        theme_countdown_text: targets.theme_text(now),
        theme_title_text: theme_title(&config.theme_name),
        current_quote: config.current_quote.clone(),
    }
}

/// Periodic display refresh.
pub struct RefreshCadence<S> {
    store: Arc<ConfigStore>,
    sink: S,
    period: Duration,
    cancel: CancellationToken,
    clock: WallClock,
}

impl<S: DisplaySink> RefreshCadence<S> {
    /// Create a cadence that reads `store` and feeds `sink`.
    pub fn new(store: Arc<ConfigStore>, sink: S, cancel: CancellationToken) -> Self {
        Self {
            store,
            sink,
            period: Duration::from_millis(DEFAULT_REFRESH_PERIOD_MS),
            cancel,
            clock: system_clock(),
        }
    }

    /// Override the tick period.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Replace the wall clock read on each tick.
    pub fn with_clock(mut self, clock: WallClock) -> Self {
        self.clock = clock;
        self
    }

    /// Tick until cancelled or until the sink goes away.
    ///
    /// Late ticks are skipped rather than bunched up.
    pub async fn run(mut self) {
        info!(period_ms = self.period.as_millis() as u64, "refresh cadence started");

        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("refresh cadence cancelled");
                    break;
                }
                _ = interval.tick() => {
                    let config = self.current_record().await;
                    let frame = compute_frame(&config, (self.clock)());
                    if !self.sink.deliver(frame) {
                        warn!("display sink closed, stopping refresh cadence");
                        break;
                    }
                }
            }
        }
    }

    /// Reload the record if the file changed, off the async workers.
    async fn current_record(&self) -> ClockConfig {
        let store = Arc::clone(&self.store);
        let read = tokio::task::spawn_blocking(move || {
            if store.reload_if_changed() {
                debug!("refresh picked up a changed record");
            }
            store.snapshot()
        });
        match read.await {
            Ok(config) => config,
            Err(e) => {
                warn!("record reload task failed, using cached record: {e}");
                self.store.snapshot()
            }
        }
    }
}
