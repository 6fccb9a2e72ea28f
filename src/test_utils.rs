use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::core::clock::{Clock, Timestamp};
use crate::core::metrics::CounterId;
use crate::device::DeviceDescriptor;
use crate::error::{Error, Result};
use crate::traits::{BoxedInstance, DeviceInstance, MockDeviceCatalog, SharedCatalog};

/// `pkg0` with `power` (1, mW) and `temp` (2, C)
pub fn pkg0_descriptor() -> DeviceDescriptor {
    DeviceDescriptor::new("pkg0").with_counter("power", CounterId(1), "mW").with_counter("temp", CounterId(2), "C")
}

/// `dev` with counters `A`, `B` and `C`
pub fn abc_descriptor() -> DeviceDescriptor {
    DeviceDescriptor::new("dev")
        .with_counter("A", CounterId(10), "mW")
        .with_counter("B", CounterId(11), "C")
        .with_counter("C", CounterId(12), "MHz")
}

/// Catalog whose devices all open as [`SequenceInstance`]s
pub fn mock_catalog(devices: Vec<DeviceDescriptor>) -> SharedCatalog {
    mock_catalog_with(devices, |_| Box::new(SequenceInstance::default()))
}

/// Catalog opening devices through `open`
pub fn mock_catalog_with<F>(devices: Vec<DeviceDescriptor>, mut open: F) -> SharedCatalog
where
    F: FnMut(&DeviceDescriptor) -> BoxedInstance + Send + 'static,
{
    let mut catalog = MockDeviceCatalog::new();
    catalog.expect_enumerate().returning(move || Ok(devices.clone()));
    catalog.expect_open().returning(move |device| Ok(open(device)));
    Arc::new(catalog)
}

/// Returns 0, 1, 2, ... for each counter independently
#[derive(Debug, Default)]
pub struct SequenceInstance {
    next: HashMap<CounterId, f64>,
}

impl DeviceInstance for SequenceInstance {
    fn read_counter(&mut self, counter: CounterId) -> Result<f64> {
        let next = self.next.entry(counter).or_insert(0.0);
        let value = *next;
        *next += 1.0;
        Ok(value)
    }
}

/// Returns a fixed value per counter and fails once `fail_after` reads have succeeded
#[derive(Debug, Clone, Default)]
pub struct FixedInstance {
    values: HashMap<CounterId, f64>,
    fail_after: Option<usize>,
    reads: Arc<AtomicUsize>,
}

impl FixedInstance {
    pub fn new(values: &[(CounterId, f64)]) -> Self {
        Self { values: values.iter().copied().collect(), ..Default::default() }
    }

    pub fn failing_after(mut self, reads: usize) -> Self {
        self.fail_after = Some(reads);
        self
    }

    /// Shared count of successful reads
    pub fn reads(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }
}

impl DeviceInstance for FixedInstance {
    fn read_counter(&mut self, counter: CounterId) -> Result<f64> {
        if self.fail_after.is_some_and(|limit| self.reads.load(Ordering::SeqCst) >= limit) {
            return Err(Error::device_read("test", counter, "injected failure"));
        }
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.values.get(&counter).copied().unwrap_or_default())
    }
}

/// Clock advancing one tick per reading
#[derive(Debug, Default)]
pub struct StepClock {
    ticks: AtomicU64,
}

impl Clock for StepClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_nanos(self.ticks.fetch_add(1, Ordering::SeqCst))
    }
}
