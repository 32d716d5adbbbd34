//! Daily quote rotation.
//!
//! - [`picker`]: uniform random selection that avoids repeating the current quote
//! - [`scheduler`]: the once-per-day background poll loop and manual rotation

pub mod picker;
pub mod scheduler;

pub use picker::{MAX_PICK_ATTEMPTS, pick_quote};
pub use scheduler::{
    DEFAULT_POLL_INTERVAL, QuoteRotationScheduler, RotationOutcome, RotationState, rotate_now,
};
