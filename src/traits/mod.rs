// Traits module
//
// Seams between the sampling engine and its collaborators: the device layer that
// enumerates and reads hardware counters, and the host sink that receives samples.

pub mod device;

pub use device::{BoxedInstance, Cursor, DeviceCatalog, DeviceInstance, SharedCatalog};

#[cfg(test)]
pub use device::{MockDeviceCatalog, MockDeviceInstance};
