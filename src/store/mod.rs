//! Config Store: the persisted countdown record and quote pool.
//!
//! # Submodules
//!
//! - [`record`]: `ClockConfig` and `QuotePool` types with defaults
//! - [`persist`]: atomic JSON read/write helpers
//! - [`service`]: `ConfigStore`, the single serializing writer

pub mod persist;
pub mod record;
pub mod service;

pub use record::{ClockConfig, DATE_FORMAT, DEFAULT_QUOTE, QuotePool, SEED_QUOTES};
pub use service::{ConfigStore, StorePaths};
