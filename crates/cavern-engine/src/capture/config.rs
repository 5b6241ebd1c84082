use std::time::Duration;

use crate::error::ConfigError;

/// Capture rate settings.
///
/// Only configuration mutates this; the running scheduler reads it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CaptureConfig {
    /// Capture passes per second. Must be positive.
    pub rate: f32,
}

impl CaptureConfig {
    pub fn new(rate: f32) -> Result<Self, ConfigError> {
        let config = Self { rate };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate.is_finite() && self.rate > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NonPositiveCaptureRate(self.rate))
        }
    }

    /// Sleep between two passes, `1 / rate`.
    ///
    /// Invalid rates map to `Duration::MAX`; `validate` rejects them first.
    pub fn interval(&self) -> Duration {
        if self.validate().is_err() {
            return Duration::MAX;
        }
        Duration::try_from_secs_f64(1.0 / f64::from(self.rate)).unwrap_or(Duration::MAX)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { rate: 10.0 }
    }
}
