/// Name under which the collection adapter registers with the host
pub const PLUGIN_NAME: &str = "intelpmt";

/// Sampling interval used when none is configured, in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 50;

/// Prefix of the environment variables read by `SamplerConfig::from_env`
pub const ENV_PREFIX: &str = "SCOREP_METRIC_INTELPMT";

/// Suffix of the sampling interval variable
pub const INTERVAL_VAR: &str = "INTERVAL";

/// Environment variable holding the log filter used by `logging::init`
pub const LOG_ENV: &str = "PMT_METRICS_LOG";

/// Log filter used when `LOG_ENV` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";
