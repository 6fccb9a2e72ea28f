//! Metric name resolution
//!
//! Metric names have the shape `<device>::<counter>` or `<device>::*`. A name is parsed once
//! into a [`MetricSpecifier`] and then resolved against the device catalog into the concrete
//! counter ids to sample, together with the property descriptors handed back to the host.
//!
//! # Examples
//!
//! ```
//! use pmt_metrics::resolver::{CounterSelector, MetricSpecifier};
//!
//! let spec: MetricSpecifier = "pkg0::*".parse().unwrap();
//! assert_eq!(spec.device(), "pkg0");
//! assert_eq!(spec.selector(), &CounterSelector::All);
//!
//! assert!("pkg0:power".parse::<MetricSpecifier>().is_err());
//! ```

use std::str::FromStr;

use crate::core::metrics::{CounterId, MetricProperty};
use crate::device::DeviceDescriptor;
use crate::error::{Error, Result};
use crate::traits::SharedCatalog;

const SEPARATOR: &str = "::";
const WILDCARD: &str = "*";

/// Which counters of a device a specifier selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterSelector {
    /// Every counter the device exposes
    All,
    /// The single counter with this exact name
    Exact(String),
}

/// Parsed form of a `<device>::<counter>` or `<device>::*` metric name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpecifier {
    device: String,
    selector: CounterSelector,
}

impl MetricSpecifier {
    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn selector(&self) -> &CounterSelector {
        &self.selector
    }

    /// Name of the metric produced for `counter_name` of this specifier's device
    pub fn metric_name(&self, counter_name: &str) -> String {
        format!("{}{}{}", self.device, SEPARATOR, counter_name)
    }
}

impl FromStr for MetricSpecifier {
    type Err = Error;

    // The device part may not contain ':'; everything after the first "::" names the counter.
    fn from_str(name: &str) -> Result<Self> {
        let (device, counter) = name.split_once(SEPARATOR).ok_or_else(|| Error::invalid_specifier(name))?;
        if device.is_empty() || device.contains(':') || counter.is_empty() {
            return Err(Error::invalid_specifier(name));
        }

        let selector = if counter == WILDCARD {
            CounterSelector::All
        } else {
            CounterSelector::Exact(counter.to_string())
        };

        Ok(Self { device: device.to_string(), selector })
    }
}

impl std::fmt::Display for MetricSpecifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.selector {
            CounterSelector::All => write!(f, "{}{}{}", self.device, SEPARATOR, WILDCARD),
            CounterSelector::Exact(counter) => write!(f, "{}{}{}", self.device, SEPARATOR, counter),
        }
    }
}

/// A counter selected by a specifier, with the property describing it to the host
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCounter {
    pub counter: CounterId,
    pub property: MetricProperty,
}

/// Outcome of resolving one specifier: the device and the counters selected on it
#[derive(Debug, Clone)]
pub struct Resolution {
    pub device: DeviceDescriptor,
    pub counters: Vec<ResolvedCounter>,
}

impl Resolution {
    pub fn properties(&self) -> Vec<MetricProperty> {
        self.counters.iter().map(|resolved| resolved.property.clone()).collect()
    }
}

/// Maps metric specifiers to device counters using the device catalog
///
/// Resolution has no side effects: nothing is opened, registered or started here.
pub struct CounterResolver {
    catalog: SharedCatalog,
}

impl CounterResolver {
    pub fn new(catalog: SharedCatalog) -> Self {
        Self { catalog }
    }

    /// Parses and resolves a metric name
    pub fn resolve_name(&self, name: &str) -> Result<Resolution> {
        self.resolve(&name.parse()?)
    }

    /// Resolves a parsed specifier
    ///
    /// Properties for a single counter carry the requested name; a wildcard yields one property
    /// per counter named `<device>::<counter>`, in the order of the device's counter table.
    pub fn resolve(&self, spec: &MetricSpecifier) -> Result<Resolution> {
        let device = self
            .catalog
            .enumerate()?
            .into_iter()
            .find(|device| device.path() == spec.device())
            .ok_or_else(|| Error::device_not_found(spec.device()))?;

        let counters = match spec.selector() {
            CounterSelector::All => device
                .counter_names()
                .iter()
                .map(|(name, &counter)| resolved(&device, spec.metric_name(name), counter))
                .collect(),
            CounterSelector::Exact(name) => {
                let counter = device
                    .counter_id(name)
                    .ok_or_else(|| Error::counter_not_found(spec.device(), name.as_str()))?;
                vec![resolved(&device, spec.to_string(), counter)]
            },
        };

        Ok(Resolution { device, counters })
    }
}

fn resolved(device: &DeviceDescriptor, name: String, counter: CounterId) -> ResolvedCounter {
    let unit = device.unit(counter).unwrap_or_default();
    ResolvedCounter { counter, property: MetricProperty::new(name, unit) }
}
