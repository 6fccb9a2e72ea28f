#![doc(html_root_url = "https://docs.rs/pmt-metrics/0.1.0")]
//! PMT Metrics - periodic sampling of hardware telemetry counters
//!
//! This crate turns metric names of the form `device::counter` (or `device::*`) into
//! background sampling of platform telemetry counters, one dedicated thread per device,
//! and hands the timestamped samples to a measurement host on demand.
//!
//! # Components
//!
//! - **Resolver**: Parses metric names and finds the matching device and counters
//! - **Sampler**: Reads the registered counters of one device at a fixed interval
//! - **Sampler Manager**: Keeps one sampler per device and routes collection requests
//! - **Collection Adapter**: The host-facing [`PmtPlugin`](plugin::PmtPlugin)
//!
//! Device access goes through the [`DeviceCatalog`](traits::DeviceCatalog) and
//! [`DeviceInstance`](traits::DeviceInstance) traits, so the platform telemetry layer can be
//! swapped for a simulated one.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pmt_metrics::device::DeviceDescriptor;
//! use pmt_metrics::prelude::*;
//!
//! struct Zero;
//!
//! impl DeviceInstance for Zero {
//!     fn read_counter(&mut self, _counter: CounterId) -> Result<f64> {
//!         Ok(0.0)
//!     }
//! }
//!
//! struct OneDevice;
//!
//! impl DeviceCatalog for OneDevice {
//!     fn enumerate(&self) -> Result<Vec<DeviceDescriptor>> {
//!         Ok(vec![DeviceDescriptor::new("pkg0").with_counter("power", CounterId(1), "mW")])
//!     }
//!
//!     fn open(&self, _device: &DeviceDescriptor) -> Result<Box<dyn DeviceInstance + Send>> {
//!         Ok(Box::new(Zero))
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let mut plugin = PmtPlugin::new(Arc::new(OneDevice), SamplerConfig::from_env()?);
//!
//!     for property in plugin.declare_metric("pkg0::*") {
//!         println!("{} [{}]", property.name, property.unit);
//!     }
//!
//!     plugin.start()?;
//!     plugin.stop()?;
//!
//!     let mut samples: Vec<Sample> = Vec::new();
//!     plugin.collect("pkg0::power", &mut samples)?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return [`Result`] with the crate's [`Error`]. Name resolution failures
//! are reported as warnings by [`PmtPlugin::declare_metric`](plugin::PmtPlugin::declare_metric)
//! and only surface as errors through `try_declare_metric`:
//!
//! ```rust
//! use pmt_metrics::{Error, Result};
//!
//! fn check(name: &str) -> Result<()> {
//!     if !name.contains("::") {
//!         return Err(Error::InvalidSpecifier(name.to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check("pkg0").is_err());
//! ```
//!
//! # Thread Safety
//!
//! Each sampler owns its device handle behind a mutex shared with its sampling thread.
//! Draining never waits for more than one counter read, and dropping a sampler stops and
//! joins its thread.

pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod plugin;
pub mod resolver;
pub mod sampler;
pub mod traits;

#[cfg(test)]
mod test_utils;

pub use error::{Error, Result};

/// Re-export common types for convenience
pub mod prelude {
    pub use crate::config::SamplerConfig;
    pub use crate::core::prelude::*;
    pub use crate::device::DeviceDescriptor;
    pub use crate::error::{Error, Result};
    pub use crate::plugin::PmtPlugin;
}
