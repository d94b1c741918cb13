//! Seeded random sources.
//!
//! The enricher takes its random source as an argument. Surfaces build a
//! fresh one from the configured seed for every load, so the same table always
//! receives the same synthetic `time_order` column regardless of how many
//! loads happened before it.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seed used when the configuration does not name one.
pub const DEFAULT_SEED: u64 = 42;

/// A deterministic random source for `seed`.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
