//! Runtime settings for the reconciliation loop.

use chrono::TimeDelta;
use modwatch_config::TrackingConfig;
use std::time::Duration;

/// Timing parameters shared by the reconciler and the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingSettings {
    /// Time between reconciliation ticks.
    pub tick_interval: Duration,
    /// Silence after which an active member becomes inactive.
    pub inactivity_threshold: Duration,
    /// How long shutdown waits for each background task.
    pub shutdown_timeout: Duration,
}

impl TrackingSettings {
    /// Inactivity threshold as a signed delta for instant arithmetic.
    pub fn inactivity_delta(&self) -> TimeDelta {
        TimeDelta::from_std(self.inactivity_threshold).unwrap_or(TimeDelta::MAX)
    }
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self::from(&TrackingConfig::default())
    }
}

impl From<&TrackingConfig> for TrackingSettings {
    fn from(config: &TrackingConfig) -> Self {
        Self {
            tick_interval: config.tick_interval(),
            inactivity_threshold: config.inactivity_threshold(),
            shutdown_timeout: config.shutdown_timeout(),
        }
    }
}
