use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::core::clock::Timestamp;
use crate::core::metrics::{CounterId, Sample};
use crate::device::DeviceDescriptor;
use crate::error::Result;

/// Device catalog shared between the resolver and the sampler manager
pub type SharedCatalog = Arc<dyn DeviceCatalog + Send + Sync>;

/// Open device handle owned by a sampler
pub type BoxedInstance = Box<dyn DeviceInstance + Send>;

/// Access to the telemetry devices present on the machine
///
/// Implemented by the hardware access layer. The sampling engine only enumerates devices,
/// opens them, and reads counters through the returned instances.
///
/// # Examples
///
/// ```rust
/// use pmt_metrics::device::DeviceDescriptor;
/// use pmt_metrics::prelude::*;
///
/// struct Constant;
///
/// impl DeviceInstance for Constant {
///     fn read_counter(&mut self, _counter: CounterId) -> Result<f64> {
///         Ok(42.0)
///     }
/// }
///
/// struct SingleDevice;
///
/// impl DeviceCatalog for SingleDevice {
///     fn enumerate(&self) -> Result<Vec<DeviceDescriptor>> {
///         Ok(vec![DeviceDescriptor::new("pkg0").with_counter("temp", CounterId(2), "C")])
///     }
///
///     fn open(&self, _device: &DeviceDescriptor) -> Result<Box<dyn DeviceInstance + Send>> {
///         Ok(Box::new(Constant))
///     }
/// }
/// ```
#[cfg_attr(test, automock)]
pub trait DeviceCatalog {
    /// All available devices, in a stable order
    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>>;

    /// Opens a device for reading
    fn open(&self, device: &DeviceDescriptor) -> Result<BoxedInstance>;
}

/// An open device from which counters can be read
#[cfg_attr(test, automock)]
pub trait DeviceInstance {
    /// Reads the current value of a counter
    fn read_counter(&mut self, counter: CounterId) -> Result<f64>;
}

/// Host-owned sink receiving collected samples in chronological order
pub trait Cursor {
    fn write(&mut self, timestamp: Timestamp, value: f64);
}

impl Cursor for Vec<Sample> {
    fn write(&mut self, timestamp: Timestamp, value: f64) {
        self.push(Sample::new(timestamp, value));
    }
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    fn write(&mut self, timestamp: Timestamp, value: f64) {
        (**self).write(timestamp, value);
    }
}
