//! Client configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// Timeout applied when a `RequestSpec` leaves its own timeout at zero.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Environment variable overriding [`ClientConfig::default_timeout`], in milliseconds.
pub const DEFAULT_TIMEOUT_ENV: &str = "HTTP_CALL_DEFAULT_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Per-call timeout used when a `RequestSpec` does not set one.
    pub default_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Build a config from the process environment. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(DEFAULT_TIMEOUT_ENV) {
            let millis: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    name: DEFAULT_TIMEOUT_ENV,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            if millis == 0 {
                return Err(ConfigError::InvalidValue {
                    name: DEFAULT_TIMEOUT_ENV,
                    value: raw,
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.default_timeout = Duration::from_millis(millis);
        }
        Ok(config)
    }

    /// Resolve the timeout for one call: the request's own value unless it is zero.
    pub fn effective_timeout(&self, requested: Duration) -> Duration {
        if requested.is_zero() {
            self.default_timeout
        } else {
            requested
        }
    }
}
