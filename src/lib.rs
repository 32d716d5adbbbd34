//! lifeclock: countdown and daily quote rotation core.
//!
//! This crate drives a countdown appliance that shows a life countdown, a
//! themed event countdown and a quote of the day.
//!
//! # Architecture
//!
//! - **Config Store**: the persisted countdown record and quote pool, with
//!   self-healing defaults and atomic writes
//! - **Countdown Calculator**: pure `(target, now)` formatting
//! - **Quote Rotation Scheduler**: a 60 s poll loop that rotates the quote once
//!   per calendar day at the trigger time
//! - **Refresh Cadence**: a 1 s tick that builds display frames
//! - **Settings**: validated partial updates written through the store

pub mod clock_dirs;
pub mod config;
pub mod countdown;
pub mod error;
pub mod refresh;
pub mod rotation;
pub mod runtime;
pub mod settings;
pub mod store;

pub use config::{AppSettings, TriggerTime};
pub use countdown::{CountdownTargets, EXPIRED_TEXT, format_remaining};
pub use error::{ClockError, Result};
pub use refresh::{DisplayFrame, DisplaySink, RefreshCadence, compute_frame};
pub use rotation::{QuoteRotationScheduler, RotationOutcome, RotationState, rotate_now};
pub use runtime::ClockRuntime;
pub use settings::{SettingsInput, apply_settings};
pub use store::{ClockConfig, ConfigStore, QuotePool, StorePaths};
