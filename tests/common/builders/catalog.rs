use std::collections::HashMap;
use std::sync::Arc;

use pmt_metrics::device::DeviceDescriptor;
use pmt_metrics::error::{Error, Result};
use pmt_metrics::traits::{BoxedInstance, DeviceCatalog, DeviceInstance, SharedCatalog};
use pmt_metrics::core::metrics::CounterId;

/// How a simulated device produces counter values
#[derive(Debug, Clone)]
pub enum Readings {
    /// Same value on every read
    Constant(HashMap<CounterId, f64>),
    /// 0, 1, 2, ... per counter
    Sequence,
}

#[derive(Debug, Clone)]
struct FakeDevice {
    descriptor: DeviceDescriptor,
    readings: Readings,
    fail_after: Option<usize>,
    fail_open: bool,
}

/// Builder for catalogs of simulated telemetry devices
#[derive(Debug, Default)]
pub struct TestCatalogBuilder {
    devices: Vec<FakeDevice>,
}

impl TestCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device returning `value` for each of its counters
    pub fn with_constant_device(mut self, path: &str, counters: &[(&str, u64, &str, f64)]) -> Self {
        let mut descriptor = DeviceDescriptor::new(path);
        let mut values = HashMap::new();
        for &(name, id, unit, value) in counters {
            descriptor = descriptor.with_counter(name, CounterId(id), unit);
            values.insert(CounterId(id), value);
        }
        self.devices.push(FakeDevice {
            descriptor,
            readings: Readings::Constant(values),
            fail_after: None,
            fail_open: false,
        });
        self
    }

    /// Adds a device counting up from zero on each counter
    pub fn with_sequence_device(mut self, path: &str, counters: &[(&str, u64, &str)]) -> Self {
        let descriptor = counters
            .iter()
            .fold(DeviceDescriptor::new(path), |d, &(name, id, unit)| d.with_counter(name, CounterId(id), unit));
        self.devices.push(FakeDevice { descriptor, readings: Readings::Sequence, fail_after: None, fail_open: false });
        self
    }

    /// Makes the most recently added device fail every read after `reads` successful ones
    pub fn failing_after(mut self, reads: usize) -> Self {
        if let Some(device) = self.devices.last_mut() {
            device.fail_after = Some(reads);
        }
        self
    }

    /// Makes the most recently added device fail to open
    pub fn failing_open(mut self) -> Self {
        if let Some(device) = self.devices.last_mut() {
            device.fail_open = true;
        }
        self
    }

    pub fn build(self) -> SharedCatalog {
        Arc::new(FakeCatalog { devices: self.devices })
    }
}

#[derive(Debug)]
struct FakeCatalog {
    devices: Vec<FakeDevice>,
}

impl DeviceCatalog for FakeCatalog {
    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>> {
        Ok(self.devices.iter().map(|d| d.descriptor.clone()).collect())
    }

    fn open(&self, device: &DeviceDescriptor) -> Result<BoxedInstance> {
        let fake = self
            .devices
            .iter()
            .find(|d| d.descriptor.path() == device.path())
            .ok_or_else(|| Error::device_open(device.path(), "no such device"))?;
        if fake.fail_open {
            return Err(Error::device_open(device.path(), "permission denied"));
        }
        Ok(Box::new(FakeInstance {
            device: device.path().to_string(),
            readings: fake.readings.clone(),
            next: HashMap::new(),
            reads: 0,
            fail_after: fake.fail_after,
        }))
    }
}

struct FakeInstance {
    device: String,
    readings: Readings,
    next: HashMap<CounterId, f64>,
    reads: usize,
    fail_after: Option<usize>,
}

impl DeviceInstance for FakeInstance {
    fn read_counter(&mut self, counter: CounterId) -> Result<f64> {
        if self.fail_after.is_some_and(|limit| self.reads >= limit) {
            return Err(Error::device_read(&self.device, counter, "device went away"));
        }
        self.reads += 1;
        match &self.readings {
            Readings::Constant(values) => Ok(values.get(&counter).copied().unwrap_or_default()),
            Readings::Sequence => {
                let next = self.next.entry(counter).or_insert(0.0);
                let value = *next;
                *next += 1.0;
                Ok(value)
            },
        }
    }
}
