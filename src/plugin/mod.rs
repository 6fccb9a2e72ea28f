//! # Collection adapter
//!
//! [`PmtPlugin`] is the surface a measurement host drives: it declares metrics by name, starts
//! and stops sampling, and periodically collects the samples buffered for each declared metric
//! into a host-owned [`Cursor`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use pmt_metrics::config::SamplerConfig;
//! use pmt_metrics::device::DeviceDescriptor;
//! use pmt_metrics::plugin::PmtPlugin;
//! use pmt_metrics::prelude::*;
//!
//! struct Constant;
//!
//! impl DeviceInstance for Constant {
//!     fn read_counter(&mut self, counter: CounterId) -> Result<f64> {
//!         Ok(if counter == CounterId(1) { 5000.0 } else { 42.0 })
//!     }
//! }
//!
//! struct Package;
//!
//! impl DeviceCatalog for Package {
//!     fn enumerate(&self) -> Result<Vec<DeviceDescriptor>> {
//!         Ok(vec![DeviceDescriptor::new("pkg0")
//!             .with_counter("power", CounterId(1), "mW")
//!             .with_counter("temp", CounterId(2), "C")])
//!     }
//!
//!     fn open(&self, _device: &DeviceDescriptor) -> Result<Box<dyn DeviceInstance + Send>> {
//!         Ok(Box::new(Constant))
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let config = SamplerConfig::default().with_interval(Duration::from_millis(10));
//!     let mut plugin = PmtPlugin::new(Arc::new(Package), config);
//!
//!     let properties = plugin.declare_metric("pkg0::*");
//!     assert_eq!(properties.len(), 2);
//!     assert!(plugin.declare_metric("missing::*").is_empty());
//!
//!     plugin.start()?;
//!     std::thread::sleep(Duration::from_millis(35));
//!     plugin.stop()?;
//!
//!     let mut samples: Vec<Sample> = Vec::new();
//!     plugin.collect("pkg0::power", &mut samples)?;
//!     assert!(samples.iter().all(|s| s.value == 5000.0));
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::SamplerConfig;
use crate::core::clock::{Clock, MonotonicClock};
use crate::core::metrics::{CounterId, MetricProperty, Sample};
use crate::error::{Error, Result};
use crate::resolver::{CounterResolver, MetricSpecifier};
use crate::sampler::{SamplerManager, SamplerState};
use crate::traits::{Cursor, SharedCatalog};

pub use crate::config::PLUGIN_NAME;

/// Device counter a declared metric name is collected from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricHandle {
    pub device: String,
    pub counter: CounterId,
}

/// Host-facing adapter over the resolver and the sampler manager
///
/// Metric names declared for the same device counter share its buffer: collecting through
/// either name drains the samples for both.
pub struct PmtPlugin {
    resolver: CounterResolver,
    manager: SamplerManager,
    handles: HashMap<String, MetricHandle>,
}

impl PmtPlugin {
    pub fn new(catalog: SharedCatalog, config: SamplerConfig) -> Self {
        Self::with_clock(catalog, config, Arc::new(MonotonicClock))
    }

    /// Creates the adapter with a host-provided clock for sample timestamps
    pub fn with_clock(catalog: SharedCatalog, config: SamplerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            resolver: CounterResolver::new(Arc::clone(&catalog)),
            manager: SamplerManager::new(catalog, config.interval, clock),
            handles: HashMap::new(),
        }
    }

    /// Declares a metric by name and returns one property per counter it resolves to
    ///
    /// Malformed names, unknown devices and unknown counters are logged as warnings and yield
    /// no properties. Declaring a name again returns the same properties without registering
    /// anything twice.
    pub fn declare_metric(&mut self, name: &str) -> Vec<MetricProperty> {
        match self.try_declare_metric(name) {
            Ok(properties) => properties,
            Err(err) if err.is_resolution_failure() => {
                log::warn!("{}, ignored", err);
                Vec::new()
            },
            Err(err) => {
                log::error!("Failed to declare metric {}: {}", name, err);
                Vec::new()
            },
        }
    }

    /// Like [`PmtPlugin::declare_metric`], but reports failures to the caller
    pub fn try_declare_metric(&mut self, name: &str) -> Result<Vec<MetricProperty>> {
        let spec: MetricSpecifier = name.parse()?;
        let resolution = self.resolver.resolve(&spec)?;
        let sampler = self.manager.get_or_create(&resolution.device)?;

        // Once sampling runs only registered counters are accepted; check them all before
        // registering any so a rejected declaration leaves nothing behind.
        if sampler.state() != SamplerState::Created {
            if let Some(missing) = resolution.counters.iter().find(|r| !sampler.is_registered(r.counter)) {
                return Err(Error::invalid_state(format!(
                    "cannot add counter {} to device {}: sampler is {}",
                    missing.counter,
                    sampler.device(),
                    sampler.state()
                )));
            }
        }
        for resolved in &resolution.counters {
            sampler.add_counter(resolved.counter)?;
        }

        let device = resolution.device.path();
        for resolved in &resolution.counters {
            self.handles.insert(
                resolved.property.name.clone(),
                MetricHandle { device: device.to_string(), counter: resolved.counter },
            );
        }

        log::debug!("Declared {} with {} counter(s)", spec, resolution.counters.len());
        Ok(resolution.properties())
    }

    /// Starts sampling on every device with declared metrics
    pub fn start(&mut self) -> Result<()> {
        self.manager.start_all()
    }

    /// Stops sampling and joins every sampling thread
    pub fn stop(&mut self) -> Result<()> {
        self.manager.stop_all()
    }

    /// Writes every sample buffered for `metric` since the last collection to `cursor`
    ///
    /// Returns the number of samples written.
    pub fn collect<C: Cursor + ?Sized>(&self, metric: &str, cursor: &mut C) -> Result<usize> {
        let samples = self.collect_values(metric)?;
        for sample in &samples {
            cursor.write(sample.timestamp, sample.value);
        }
        Ok(samples.len())
    }

    /// Takes every sample buffered for `metric` since the last collection
    pub fn collect_values(&self, metric: &str) -> Result<Vec<Sample>> {
        let handle = self.handle(metric).ok_or_else(|| Error::UnknownMetric(metric.to_string()))?;
        self.manager.route_drain(&handle.device, handle.counter)
    }

    pub fn handle(&self, metric: &str) -> Option<&MetricHandle> {
        self.handles.get(metric)
    }

    /// Names of all declared metrics
    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }

    pub fn manager(&self) -> &SamplerManager {
        &self.manager
    }
}
