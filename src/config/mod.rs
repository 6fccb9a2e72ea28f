//! Sampler configuration
//!
//! The only tunable is the sampling interval. It is read once when the collection adapter is
//! constructed and applies to every sampler created afterwards.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use pmt_metrics::config::SamplerConfig;
//!
//! let config = SamplerConfig::default();
//! assert_eq!(config.interval, Duration::from_millis(50));
//!
//! let config = SamplerConfig::from_json(r#"{ "interval_ms": 10 }"#).unwrap();
//! assert_eq!(config.interval, Duration::from_millis(10));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod constants;

pub use constants::*;

/// Settings applied to every sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Pause between two sampling passes
    #[serde(rename = "interval_ms", with = "interval_ms")]
    pub interval: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { interval: Duration::from_millis(DEFAULT_INTERVAL_MS) }
    }
}

impl SamplerConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Reads `SCOREP_METRIC_INTELPMT_INTERVAL` (milliseconds)
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Reads `<prefix>_INTERVAL` (milliseconds), falling back to the default when unset
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        Self::from_lookup(prefix, |name| std::env::var(name).ok())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::configuration("sampling interval must be at least 1 ms"));
        }
        Ok(())
    }

    fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let name = format!("{}_{}", prefix, INTERVAL_VAR);
        let config = match lookup(&name) {
            Some(raw) => {
                let millis: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| Error::configuration(format!("{} is not a number of milliseconds: {:?}", name, raw)))?;
                Self::default().with_interval(Duration::from_millis(millis))
            },
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

mod interval_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(interval: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
