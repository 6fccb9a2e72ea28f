// Core modules
pub mod clock;
pub mod metrics;

/// Core prelude module that re-exports commonly used types and traits
pub mod prelude {
    pub use super::clock::{Clock, MonotonicClock, Timestamp};
    pub use super::metrics::{CounterId, MetricMode, MetricProperty, Sample, ValueType};
    pub use crate::traits::{Cursor, DeviceCatalog, DeviceInstance};
}
