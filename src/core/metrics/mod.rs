/// # Core Metrics Module
///
/// Value types shared by the sampler, the resolver and the collection adapter.
///
/// ## Example
///
/// ```rust
/// use pmt_metrics::core::clock::Timestamp;
/// use pmt_metrics::core::metrics::{CounterId, Sample};
///
/// let sample = Sample::new(Timestamp::from_nanos(1_000), 5000.0);
/// assert_eq!(sample.value, 5000.0);
/// assert_eq!(CounterId(1).to_string(), "1");
/// ```
use serde::{Deserialize, Serialize};

use crate::core::clock::Timestamp;

pub mod types;

pub use types::{MetricMode, MetricProperty, ValueType};

/// Identifier of a counter, unique within one device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CounterId(pub u64);

impl CounterId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for CounterId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CounterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single counter reading with the time it was taken
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// When the value was read
    pub timestamp: Timestamp,
    /// The value as reported by the device
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: Timestamp, value: f64) -> Self {
        Self { timestamp, value }
    }
}
