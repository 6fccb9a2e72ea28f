use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::core::clock::Clock;
use crate::core::metrics::{CounterId, Sample};
use crate::device::DeviceDescriptor;
use crate::error::{Error, Result};
use crate::sampler::{Sampler, SamplerState};
use crate::traits::SharedCatalog;

/// Owns one [`Sampler`] per active device, keyed by device path
pub struct SamplerManager {
    catalog: SharedCatalog,
    clock: Arc<dyn Clock>,
    interval: Duration,
    samplers: HashMap<String, Sampler>,
    /// Set by the first `start_all`; no device can be added afterwards
    started: bool,
}

impl SamplerManager {
    pub fn new(catalog: SharedCatalog, interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { catalog, clock, interval, samplers: HashMap::new(), started: false }
    }

    /// Returns the sampler of `device`, opening the device and creating the sampler on first use
    ///
    /// New samplers can only be created before [`SamplerManager::start_all`]; afterwards an
    /// unknown device fails with `InvalidState` without being opened.
    pub fn get_or_create(&mut self, device: &DeviceDescriptor) -> Result<&mut Sampler> {
        match self.samplers.entry(device.path().to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(_) if self.started => Err(Error::invalid_state(format!(
                "cannot add device {}: sampling has already started",
                device.path()
            ))),
            Entry::Vacant(entry) => {
                let instance = self.catalog.open(device)?;
                tracing::debug!(device = device.path(), "opened device");
                Ok(entry.insert(Sampler::new(device, instance, self.interval, Arc::clone(&self.clock))))
            },
        }
    }

    /// Registers `counter` with the sampler of `device`, creating the sampler if needed
    ///
    /// Returns `Ok(false)` when the counter was already registered.
    pub fn register(&mut self, device: &DeviceDescriptor, counter: CounterId) -> Result<bool> {
        self.get_or_create(device)?.add_counter(counter)
    }

    /// Starts every sampler that has not been started yet
    ///
    /// Every sampler is attempted; the first failure is returned.
    pub fn start_all(&mut self) -> Result<()> {
        self.started = true;
        let mut first_error = None;
        for sampler in self.samplers.values_mut() {
            if sampler.state() != SamplerState::Created {
                log::warn!("Sampler for device {} is already {}, not started again", sampler.device(), sampler.state());
                continue;
            }
            if let Err(err) = sampler.start() {
                log::error!("Failed to start sampler for device {}: {}", sampler.device(), err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Stops and joins every sampler, including ones that were never started
    ///
    /// Every sampler is stopped even if some report errors; the first error is returned.
    pub fn stop_all(&mut self) -> Result<()> {
        let mut first_error = None;
        for sampler in self.samplers.values_mut() {
            if let Err(err) = sampler.stop() {
                log::error!("Sampler for device {} ended with error: {}", sampler.device(), err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Drains the buffered samples of one counter of one device
    pub fn route_drain(&self, device: &str, counter: CounterId) -> Result<Vec<Sample>> {
        self.sampler(device).ok_or_else(|| Error::UnknownDevice(device.to_string()))?.drain(counter)
    }

    pub fn sampler(&self, device: &str) -> Option<&Sampler> {
        self.samplers.get(device)
    }

    /// Paths of all devices with a sampler
    pub fn devices(&self) -> impl Iterator<Item = &str> {
        self.samplers.keys().map(String::as_str)
    }

    /// Whether `start_all` has been called
    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.samplers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samplers.is_empty()
    }
}

impl std::fmt::Debug for SamplerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplerManager")
            .field("interval", &self.interval)
            .field("started", &self.started)
            .field("samplers", &self.samplers.values().collect::<Vec<_>>())
            .finish()
    }
}
