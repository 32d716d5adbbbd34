//! Random quote selection with bounded resampling.

use rand::Rng;
use rand::seq::SliceRandom;

/// Total draws allowed when trying to avoid repeating the current quote.
///
/// The last draw is accepted even if it equals the current quote.
pub const MAX_PICK_ATTEMPTS: usize = 5;

/// Pick a quote uniformly from `pool`, preferring one different from `current`.
///
/// With a single-entry pool that entry is returned as-is. Returns `None`
/// only when the pool is empty.
pub fn pick_quote<R: Rng + ?Sized>(pool: &[String], current: &str, rng: &mut R) -> Option<String> {
    let mut pick = pool.choose(rng)?;
    if pool.len() > 1 {
        for _ in 1..MAX_PICK_ATTEMPTS {
            if pick != current {
                break;
            }
            pick = pool.choose(rng)?;
        }
    }
    Some(pick.clone())
}
