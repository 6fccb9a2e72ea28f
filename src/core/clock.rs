//! Monotonic time source used to stamp samples
//!
//! Every sampler of a process stamps its readings from the same [`Clock`], so samples from
//! different devices share one time base even though they are not synchronized to each other.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Point in time expressed in clock ticks (nanoseconds)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, zero if `earlier` is later than `self`
    pub fn saturating_duration_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

/// Source of sample timestamps
pub trait Clock: Send + Sync + Debug {
    /// Current time; never decreases between calls
    fn now(&self) -> Timestamp;
}

/// Clock counting nanoseconds since the first time any `MonotonicClock` was read in this process
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        let nanos = EPOCH.elapsed().as_nanos();
        Timestamp(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
