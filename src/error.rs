use crate::core::metrics::CounterId;

/// Error type for pmt-metrics operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The metric name does not have the `<device>::<counter>` shape
    #[error("Invalid sensor: {0}")]
    InvalidSpecifier(String),

    /// No device in the catalog carries the requested path
    #[error("Unknown device: {0}")]
    DeviceNotFound(String),

    /// The device exists but exposes no counter with the requested name
    #[error("Could not find counter: {counter} in device {device}")]
    CounterNotFound { device: String, counter: String },

    /// No sampler has been created for the device
    #[error("No sampler for device: {0}")]
    UnknownDevice(String),

    /// The counter was never registered with the device's sampler
    #[error("Counter {counter} is not registered with device {device}")]
    UnknownCounter { device: String, counter: CounterId },

    /// The metric name was never declared
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Failed to open device {device}: {message}")]
    DeviceOpen { device: String, message: String },

    #[error("Failed to read counter {counter} on device {device}: {message}")]
    DeviceRead { device: String, counter: CounterId, message: String },

    /// A lifecycle operation was requested in a state that does not allow it
    #[error("Invalid sampler state: {0}")]
    InvalidState(String),

    #[error("Sampling thread for device {0} panicked")]
    SamplerPanicked(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_specifier<S: Into<String>>(spec: S) -> Self {
        Error::InvalidSpecifier(spec.into())
    }

    pub(crate) fn device_not_found<S: Into<String>>(device: S) -> Self {
        Error::DeviceNotFound(device.into())
    }

    pub(crate) fn counter_not_found<D: Into<String>, C: Into<String>>(device: D, counter: C) -> Self {
        Error::CounterNotFound { device: device.into(), counter: counter.into() }
    }

    pub(crate) fn invalid_state<S: Into<String>>(msg: S) -> Self {
        Error::InvalidState(msg.into())
    }

    pub(crate) fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Creates the error a device layer returns when it cannot open a device
    pub fn device_open<D: Into<String>, M: Into<String>>(device: D, message: M) -> Self {
        Error::DeviceOpen { device: device.into(), message: message.into() }
    }

    /// Creates the error a device layer returns when a counter read fails
    pub fn device_read<D: Into<String>, M: Into<String>>(device: D, counter: CounterId, message: M) -> Self {
        Error::DeviceRead { device: device.into(), counter, message: message.into() }
    }

    /// Returns true for the non-fatal errors produced while resolving a metric name
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Error::InvalidSpecifier(_) | Error::DeviceNotFound(_) | Error::CounterNotFound { .. }
        )
    }
}

/// Result type for pmt-metrics operations
pub type Result<T> = std::result::Result<T, Error>;
