//! Telemetry device descriptions
//!
//! A [`DeviceDescriptor`] is what the device layer reports for one physically addressable
//! telemetry device: its path, the table mapping counter names to counter ids, and the unit of
//! each counter.
//!
//! # Examples
//!
//! ```
//! use pmt_metrics::core::metrics::CounterId;
//! use pmt_metrics::device::DeviceDescriptor;
//!
//! let device = DeviceDescriptor::new("/sys/class/intel_pmt/telem1")
//!     .with_counter("power", CounterId(1), "mW")
//!     .with_counter("temp", CounterId(2), "C");
//!
//! assert_eq!(device.counter_id("temp"), Some(CounterId(2)));
//! assert_eq!(device.unit(CounterId(1)), Some("mW"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::metrics::CounterId;

/// One telemetry device as reported by the device layer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    path: String,
    counter_names: BTreeMap<String, CounterId>,
    units: BTreeMap<CounterId, String>,
}

impl DeviceDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Adds a counter with its unit, replacing any counter of the same name
    pub fn with_counter(mut self, name: impl Into<String>, id: CounterId, unit: impl Into<String>) -> Self {
        self.counter_names.insert(name.into(), id);
        self.units.insert(id, unit.into());
        self
    }

    /// Device identifier, unique among the devices of a catalog
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Counter name table, ordered by name
    pub fn counter_names(&self) -> &BTreeMap<String, CounterId> {
        &self.counter_names
    }

    pub fn counter_id(&self, name: &str) -> Option<CounterId> {
        self.counter_names.get(name).copied()
    }

    pub fn unit(&self, counter: CounterId) -> Option<&str> {
        self.units.get(&counter).map(String::as_str)
    }

    pub fn counter_count(&self) -> usize {
        self.counter_names.len()
    }
}
