//! Unique instant generator.
//!
//! Produces nanosecond timestamps used as the tie-break key of
//! [`ScoreSkipList`](crate::ds::ScoreSkipList) nodes. Each reading is the
//! wall clock plus a small counter, so back-to-back calls inside one clock
//! tick still return increasing values.
//!
//! The counter is bounded to `0..DELTA_BOUND` and wraps to zero. Two calls
//! separated by a wrap can therefore collide (or step backwards by less than
//! `DELTA_BOUND` ns) if the clock barely moved in between. The skip list
//! tolerates equal instants; they only weaken the recency tie-break.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Exclusive upper bound of the per-call counter.
pub const DELTA_BOUND: i64 = 512;

/// Thread-safe source of effectively unique `i64` instants.
#[derive(Debug, Default)]
pub struct UniqueInstant {
    delta: Mutex<i64>,
}

impl UniqueInstant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current wall-clock nanoseconds plus the running counter.
    ///
    /// The clock is read under the counter lock so that, between wraps,
    /// readings are strictly increasing across all callers.
    pub fn now(&self) -> i64 {
        let mut delta = self.delta.lock();
        let stamp = wall_clock_nanos().saturating_add(*delta);
        *delta += 1;
        if *delta >= DELTA_BOUND {
            *delta = 0;
        }
        stamp
    }
}

fn wall_clock_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
