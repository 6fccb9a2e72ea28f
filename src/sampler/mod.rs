//! # Per-device sampling
//!
//! A [`Sampler`] owns one open telemetry device, the counters registered on it, and one buffer
//! per counter. Once started, a dedicated thread reads every registered counter in turn, stamps
//! each value with the shared clock and appends it to that counter's buffer, then sleeps for the
//! configured interval. Consumers take buffered samples out with [`Sampler::drain`].
//!
//! ## Locking
//!
//! One mutex guards the device handle and all buffers of a sampler. The sampling thread holds it
//! for exactly one read and one append; `drain` holds it for one take of a buffer. It is never
//! held across the sleep or across several counters, so a consumer waits at most for a single
//! counter read.
//!
//! ## Lifecycle
//!
//! `Created → Running → Stopped`. Counters can only be added while `Created`. The stop flag is
//! checked once per pass, so [`Sampler::stop`] can block for up to one interval plus one pass.
//! A read error ends the thread of that sampler only; the sampler then reports
//! [`SamplerState::Failed`] and the error is returned by the next `stop`.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use pmt_metrics::device::DeviceDescriptor;
//! use pmt_metrics::prelude::*;
//! use pmt_metrics::sampler::Sampler;
//!
//! struct Constant(f64);
//!
//! impl DeviceInstance for Constant {
//!     fn read_counter(&mut self, _counter: CounterId) -> Result<f64> {
//!         Ok(self.0)
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let device = DeviceDescriptor::new("pkg0").with_counter("power", CounterId(1), "mW");
//!     let mut sampler = Sampler::new(
//!         &device,
//!         Box::new(Constant(5000.0)),
//!         Duration::from_millis(5),
//!         Arc::new(MonotonicClock),
//!     );
//!
//!     sampler.add_counter(CounterId(1))?;
//!     sampler.start()?;
//!     std::thread::sleep(Duration::from_millis(20));
//!     sampler.stop()?;
//!
//!     let samples = sampler.drain(CounterId(1))?;
//!     assert!(!samples.is_empty());
//!     assert!(sampler.drain(CounterId(1))?.is_empty());
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use crate::core::clock::Clock;
use crate::core::metrics::{CounterId, Sample};
use crate::device::DeviceDescriptor;
use crate::error::{Error, Result};
use crate::traits::BoxedInstance;

pub mod manager;

pub use manager::SamplerManager;

/// Lifecycle state of a sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// Accepting counter registrations, not sampling yet
    Created,
    /// Sampling thread is running
    Running,
    /// Sampling thread ended on a device read error and has not been joined yet
    Failed,
    /// Sampling thread has been joined
    Stopped,
}

impl std::fmt::Display for SamplerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplerState::Created => write!(f, "created"),
            SamplerState::Running => write!(f, "running"),
            SamplerState::Failed => write!(f, "failed"),
            SamplerState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Device handle and sample buffers, always accessed under one lock
struct Channels {
    instance: BoxedInstance,
    counters: Vec<CounterId>,
    buffers: HashMap<CounterId, Vec<Sample>>,
}

/// State shared between a sampler and its thread
struct Shared {
    device: String,
    channels: Mutex<Channels>,
    stop: AtomicBool,
    /// Set while the sampling thread is alive
    sampling: AtomicBool,
}

/// Periodic sampler for the registered counters of one device
pub struct Sampler {
    shared: Arc<Shared>,
    interval: Duration,
    clock: Arc<dyn Clock>,
    state: SamplerState,
    thread: Option<JoinHandle<Result<()>>>,
}

impl Sampler {
    /// Creates a sampler for an already opened device
    pub fn new(device: &DeviceDescriptor, instance: BoxedInstance, interval: Duration, clock: Arc<dyn Clock>) -> Self {
        let channels = Channels { instance, counters: Vec::new(), buffers: HashMap::new() };
        Self {
            shared: Arc::new(Shared {
                device: device.path().to_string(),
                channels: Mutex::new(channels),
                stop: AtomicBool::new(false),
                sampling: AtomicBool::new(false),
            }),
            interval,
            clock,
            state: SamplerState::Created,
            thread: None,
        }
    }

    /// Path of the sampled device
    pub fn device(&self) -> &str {
        &self.shared.device
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> SamplerState {
        match self.state {
            SamplerState::Running if !self.shared.sampling.load(Ordering::Acquire) => SamplerState::Failed,
            state => state,
        }
    }

    /// Registered counters in sampling order
    pub fn counters(&self) -> Vec<CounterId> {
        self.shared.channels.lock().counters.clone()
    }

    pub fn is_registered(&self, counter: CounterId) -> bool {
        self.shared.channels.lock().buffers.contains_key(&counter)
    }

    /// Registers a counter and allocates its buffer
    ///
    /// Returns `Ok(false)` if the counter was already registered. New counters are only accepted
    /// before [`Sampler::start`].
    pub fn add_counter(&mut self, counter: CounterId) -> Result<bool> {
        let mut channels = self.shared.channels.lock();
        if channels.buffers.contains_key(&counter) {
            return Ok(false);
        }
        if self.state != SamplerState::Created {
            return Err(Error::invalid_state(format!(
                "cannot add counter {} to device {}: sampler is {}",
                counter, self.shared.device, self.state
            )));
        }
        channels.counters.push(counter);
        channels.buffers.insert(counter, Vec::new());
        Ok(true)
    }

    /// Spawns the sampling thread
    #[tracing::instrument(skip(self), fields(device = %self.shared.device))]
    pub fn start(&mut self) -> Result<()> {
        if self.state != SamplerState::Created {
            return Err(Error::invalid_state(format!(
                "cannot start sampler for device {}: sampler is {}",
                self.shared.device,
                self.state()
            )));
        }

        let shared = Arc::clone(&self.shared);
        let clock = Arc::clone(&self.clock);
        let interval = self.interval;

        self.shared.sampling.store(true, Ordering::Release);
        let spawned = thread::Builder::new()
            .name(format!("pmt-sampler {}", self.shared.device))
            .spawn(move || sample_loop(shared, clock.as_ref(), interval));

        match spawned {
            Ok(handle) => {
                self.thread = Some(handle);
                self.state = SamplerState::Running;
                tracing::debug!(interval_ms = interval.as_millis() as u64, "sampling started");
                Ok(())
            },
            Err(err) => {
                self.shared.sampling.store(false, Ordering::Release);
                Err(err.into())
            },
        }
    }

    /// Stops the sampling thread and waits for it to exit
    ///
    /// Safe to call in any state and any number of times. Returns the read error that ended
    /// the thread, if any, on the first call after it happened.
    #[tracing::instrument(skip(self), fields(device = %self.shared.device))]
    pub fn stop(&mut self) -> Result<()> {
        if self.state != SamplerState::Running {
            return Ok(());
        }

        self.shared.stop.store(true, Ordering::Release);
        self.state = SamplerState::Stopped;

        let Some(handle) = self.thread.take() else {
            return Ok(());
        };
        let outcome = handle.join().map_err(|_| Error::SamplerPanicked(self.shared.device.clone()))?;
        tracing::debug!("sampling stopped");
        outcome
    }

    /// Takes every sample buffered for `counter` since the previous drain
    pub fn drain(&self, counter: CounterId) -> Result<Vec<Sample>> {
        let mut channels = self.shared.channels.lock();
        channels
            .buffers
            .get_mut(&counter)
            .map(std::mem::take)
            .ok_or_else(|| Error::UnknownCounter { device: self.shared.device.clone(), counter })
    }

    /// Number of samples currently buffered for `counter`
    pub fn pending(&self, counter: CounterId) -> Result<usize> {
        let channels = self.shared.channels.lock();
        channels
            .buffers
            .get(&counter)
            .map(Vec::len)
            .ok_or_else(|| Error::UnknownCounter { device: self.shared.device.clone(), counter })
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            tracing::warn!(device = %self.shared.device, error = %err, "sampler stopped with error");
        }
    }
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("device", &self.shared.device)
            .field("interval", &self.interval)
            .field("state", &self.state())
            .finish()
    }
}

fn sample_loop(shared: Arc<Shared>, clock: &dyn Clock, interval: Duration) -> Result<()> {
    let shared = scopeguard::guard(shared, |shared| shared.sampling.store(false, Ordering::Release));

    // Registration is closed once the thread runs, so the order is fixed for its lifetime.
    let counters = shared.channels.lock().counters.clone();

    while !shared.stop.load(Ordering::Acquire) {
        for &counter in &counters {
            let mut channels = shared.channels.lock();
            let value = channels.instance.read_counter(counter).map_err(|err| {
                tracing::error!(device = %shared.device, %counter, error = %err, "counter read failed, sampling ends");
                err
            })?;
            let timestamp = clock.now();
            let buffer = channels.buffers.get_mut(&counter);
            debug_assert!(buffer.is_some(), "counter {counter} sampled without a buffer");
            if let Some(buffer) = buffer {
                buffer.push(Sample::new(timestamp, value));
            }
        }
        thread::sleep(interval);
    }

    Ok(())
}
