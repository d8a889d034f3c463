//! Delivery tracker configuration.

use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// Configuration for the delivery tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// How long a requested modifier may stay outstanding before a
    /// delivery check fires.
    pub delivery_timeout: Duration,

    /// Number of delivery checks tolerated before giving up on the peer and
    /// reverting the modifier to `Unknown`.
    pub max_delivery_checks: u32,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            delivery_timeout: Duration::from_secs(10),
            max_delivery_checks: 100,
        }
    }
}

impl DeliveryConfig {
    /// Create a config with explicit timeout and check limit.
    pub fn new(delivery_timeout: Duration, max_delivery_checks: u32) -> Self {
        Self {
            delivery_timeout,
            max_delivery_checks,
        }
    }

    /// Create a config with a custom check limit and the default timeout.
    pub fn with_max_checks(max_delivery_checks: u32) -> Self {
        Self {
            max_delivery_checks,
            ..Default::default()
        }
    }

    /// Reject settings the tracker cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delivery_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "delivery_timeout must be greater than zero".to_string(),
            ));
        }
        if self.max_delivery_checks == 0 {
            return Err(ConfigError::Invalid(
                "max_delivery_checks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a `[delivery]`-style TOML table.
    ///
    /// Missing keys keep their defaults. The timeout is given in
    /// milliseconds:
    ///
    /// ```toml
    /// delivery_timeout_ms = 10000
    /// max_delivery_checks = 100
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let file: DeliveryConfigFile = toml::from_str(input)?;
        let defaults = Self::default();

        let config = Self {
            delivery_timeout: file
                .delivery_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.delivery_timeout),
            max_delivery_checks: file
                .max_delivery_checks
                .unwrap_or(defaults.max_delivery_checks),
        };
        config.validate()?;
        Ok(config)
    }
}

/// On-disk shape of [`DeliveryConfig`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeliveryConfigFile {
    delivery_timeout_ms: Option<u64>,
    max_delivery_checks: Option<u32>,
}
