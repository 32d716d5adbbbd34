//! Once-per-day quote rotation.
//!
//! [`QuoteRotationScheduler`] polls wall-clock time on a fixed interval
//! (60 s by default). When the local hour and minute equal the configured
//! trigger time and the persisted `last_quote_update` is not today, it picks a
//! new quote and persists the quote together with today's date in a single
//! [`ConfigStore::update`]. The persisted date is the idempotency guard, so
//! a restart inside the trigger minute does not rotate twice.
//!
//! Drift of up to one poll interval relative to the trigger time is
//! acceptable. The poll interval must not exceed one minute or the trigger
//! minute can be skipped entirely.

use crate::config::TriggerTime;
use crate::countdown::{WallClock, system_clock};
use crate::error::{ClockError, Result};
use crate::store::{ClockConfig, ConfigStore, QuotePool};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::picker::pick_quote;

/// Default interval between rotation polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Rotation state machine.
///
/// `Eligible` and `Rotated` only exist while a single poll runs; between polls
/// the scheduler is always `Idle`. Transitions are traced at `debug` level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationState {
    /// Waiting for the trigger time.
    Idle,
    /// Trigger time reached and today has not been rotated yet.
    Eligible,
    /// A new quote was just persisted.
    Rotated,
}

/// Result of a single [`QuoteRotationScheduler::poll_at`] step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// Local time is not the trigger minute.
    NotDue,
    /// Trigger minute, but `last_quote_update` is already today.
    AlreadyRotatedToday,
    /// A new quote was applied.
    Rotated {
        /// The quote now displayed.
        quote: String,
    },
    /// The pool has no quotes; nothing was written.
    SkippedEmptyPool,
    /// The store rejected the rotation; nothing changed. Retried on the next
    /// poll inside the trigger minute.
    Failed {
        /// Why the store refused the update.
        reason: String,
    },
}

/// Background task that rotates the displayed quote once per calendar day.
pub struct QuoteRotationScheduler {
    store: Arc<ConfigStore>,
    pool: QuotePool,
    trigger: TriggerTime,
    poll_interval: Duration,
    cancel: CancellationToken,
    clock: WallClock,
    state: RotationState,
    rng: StdRng,
}

impl QuoteRotationScheduler {
    /// Create a scheduler over `store` and `pool` that fires at `trigger`.
    ///
    /// Call [`run`](Self::run) to start polling.
    pub fn new(
        store: Arc<ConfigStore>,
        pool: QuotePool,
        trigger: TriggerTime,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            store,
            pool,
            trigger,
            poll_interval: DEFAULT_POLL_INTERVAL,
            cancel,
            clock: system_clock(),
            state: RotationState::Idle,
            rng: StdRng::from_entropy(),
        }
    }

    /// Override the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Use a deterministic random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Replace the wall clock the run loop reads.
    pub fn with_clock(mut self, clock: WallClock) -> Self {
        self.clock = clock;
        self
    }

    /// Run one poll against `now`.
    pub fn poll_at(&mut self, now: NaiveDateTime) -> RotationOutcome {
        if now.hour() != self.trigger.hour || now.minute() != self.trigger.minute {
            return RotationOutcome::NotDue;
        }

        let today = now.date();
        self.store.reload_if_changed();
        if self.store.snapshot().last_quote_update == Some(today) {
            debug!(%today, "quote already rotated today");
            return RotationOutcome::AlreadyRotatedToday;
        }

        self.transition(RotationState::Eligible);

        if self.pool.is_empty() {
            warn!(%today, "rotation skipped: {}", ClockError::QuotePoolEmpty);
            self.transition(RotationState::Idle);
            return RotationOutcome::SkippedEmptyPool;
        }

        let pool = &self.pool;
        let rng = &mut self.rng;
        let mut picked = String::new();
        let result = self.store.update(|config| {
            if let Some(quote) = pick_quote(pool.as_slice(), &config.current_quote, rng) {
                config.current_quote = quote.clone();
                config.last_quote_update = Some(today);
                picked = quote;
            }
        });

        self.settle(today, picked, result)
    }

    /// Map the store's answer to an outcome and return to `Idle`.
    fn settle(
        &mut self,
        today: NaiveDate,
        picked: String,
        result: Result<ClockConfig>,
    ) -> RotationOutcome {
        match result {
            Ok(_) => info!(%today, quote = %picked, "daily quote rotated"),
            // The in-memory record already carries the rotation.
            Err(ClockError::ConfigWriteFailed(_)) => {
                warn!(%today, quote = %picked, "daily quote rotated but not persisted");
            }
            Err(e) => {
                error!(%today, "daily quote rotation failed: {e}");
                self.transition(RotationState::Idle);
                return RotationOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        }

        self.transition(RotationState::Rotated);
        self.transition(RotationState::Idle);
        RotationOutcome::Rotated { quote: picked }
    }

    /// Run the poll loop until the cancellation token is cancelled.
    ///
    /// Intended to be spawned as a background task:
    ///
    /// ```rust,ignore
    /// let scheduler = QuoteRotationScheduler::new(store, pool, trigger, cancel.child_token());
    /// tokio::spawn(scheduler.run());
    /// ```
    ///
    /// Each poll reads and may fsync the record file, so it runs on the
    /// blocking thread pool and a slow disk cannot stall other tasks.
    pub async fn run(self) {
        info!(
            trigger = %self.trigger,
            poll_secs = self.poll_interval.as_secs_f64(),
            pool_size = self.pool.len(),
            "quote rotation scheduler started"
        );

        let cancel = self.cancel.clone();
        let clock = Arc::clone(&self.clock);
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut scheduler = self;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("quote rotation scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    let now = clock();
                    let poll = tokio::task::spawn_blocking(move || {
                        let outcome = scheduler.poll_at(now);
                        (scheduler, outcome)
                    });
                    match poll.await {
                        Ok((returned, outcome)) => {
                            debug!(%now, ?outcome, "rotation poll");
                            scheduler = returned;
                        }
                        Err(e) => {
                            error!("rotation poll task failed, stopping scheduler: {e}");
                            break;
                        }
                    }
                }
            }
        }
    }

    fn transition(&mut self, next: RotationState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "rotation state");
            self.state = next;
        }
    }
}

/// Replace the displayed quote immediately.
///
/// Unlike the daily rotation this leaves `last_quote_update` alone, so the
/// next scheduled rotation still happens.
///
/// # Errors
/// - [`ClockError::QuotePoolEmpty`] if there is nothing to pick from.
/// - [`ClockError::ConfigWriteFailed`] if persisting fails; the new quote is
///   still shown.
pub fn rotate_now<R: Rng + ?Sized>(
    store: &ConfigStore,
    pool: &QuotePool,
    rng: &mut R,
) -> Result<String> {
    if pool.is_empty() {
        return Err(ClockError::QuotePoolEmpty);
    }

    let mut picked = String::new();
    store.update(|config| {
        if let Some(quote) = pick_quote(pool.as_slice(), &config.current_quote, rng) {
            config.current_quote = quote.clone();
            picked = quote;
        }
    })?;
    info!(quote = %picked, "quote rotated on request");
    Ok(picked)
}
