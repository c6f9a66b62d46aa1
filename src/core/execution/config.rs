//! Configuration for a queueing-network run
//!
//! This module provides the parameter bundle consumed when an engine is
//! constructed, together with its validation rules.

use serde::{Deserialize, Serialize};

use crate::core::errors::ConfigError;

/// Horizon used by bulk runs when the caller has no better bound
pub const DEFAULT_MAX_TIME: f64 = 9999.0;

/// Parameters of one simulation run
///
/// Every field is fixed for the lifetime of the engine built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of buffer slots
    pub buffer_capacity: usize,
    /// Number of parallel devices
    pub device_count: usize,
    /// Number of independent arrival streams
    pub source_count: usize,
    /// Uniform inter-arrival bounds `(min, max)`
    pub interarrival: (f64, f64),
    /// Exponential service rate λ
    pub service_rate: f64,
    /// Maximum events processed by a bulk run
    pub step_budget: u64,
    /// Assign arrivals straight to a free device when one exists
    pub direct_placement: bool,
    /// Seed of the run's random generator
    pub seed: u64,
}

impl NetworkConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            buffer_capacity: 12,
            device_count: 3,
            source_count: 4,
            interarrival: (0.8, 2.2),
            service_rate: 1.0,
            step_budget: 40,
            direct_placement: false,
            seed: 42,
        }
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn with_devices(mut self, count: usize) -> Self {
        self.device_count = count;
        self
    }

    pub fn with_sources(mut self, count: usize) -> Self {
        self.source_count = count;
        self
    }

    pub fn with_interarrival(mut self, min: f64, max: f64) -> Self {
        self.interarrival = (min, max);
        self
    }

    pub fn with_service_rate(mut self, rate: f64) -> Self {
        self.service_rate = rate;
        self
    }

    pub fn with_step_budget(mut self, steps: u64) -> Self {
        self.step_budget = steps;
        self
    }

    pub fn with_direct_placement(mut self, enabled: bool) -> Self {
        self.direct_placement = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check ranges and positivity.
    ///
    /// # Returns
    /// The first violated rule, if any
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_capacity == 0 {
            return Err(ConfigError::ZeroBufferCapacity);
        }

        if self.device_count == 0 {
            return Err(ConfigError::NoDevices);
        }

        if self.source_count == 0 {
            return Err(ConfigError::NoSources);
        }

        let (min, max) = self.interarrival;
        if !(min.is_finite() && max.is_finite() && 0.0 < min && min < max) {
            return Err(ConfigError::InvalidInterarrival { min, max });
        }

        if !(self.service_rate.is_finite() && self.service_rate > 0.0) {
            return Err(ConfigError::InvalidServiceRate(self.service_rate));
        }

        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NetworkConfig::default();
        assert_eq!(config.buffer_capacity, 12);
        assert_eq!(config.device_count, 3);
        assert_eq!(config.source_count, 4);
        assert_eq!(config.interarrival, (0.8, 2.2));
        assert_eq!(config.service_rate, 1.0);
        assert_eq!(config.step_budget, 40);
        assert!(!config.direct_placement);
        assert_eq!(config.seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = NetworkConfig::new()
            .with_buffer_capacity(3)
            .with_devices(2)
            .with_sources(5)
            .with_interarrival(0.1, 0.4)
            .with_service_rate(2.5)
            .with_step_budget(500)
            .with_direct_placement(true)
            .with_seed(7);

        assert_eq!(config.buffer_capacity, 3);
        assert_eq!(config.device_count, 2);
        assert_eq!(config.source_count, 5);
        assert_eq!(config.interarrival, (0.1, 0.4));
        assert_eq!(config.service_rate, 2.5);
        assert_eq!(config.step_budget, 500);
        assert!(config.direct_placement);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_validation() {
        let config = NetworkConfig::default().with_buffer_capacity(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroBufferCapacity));

        let config = NetworkConfig::default().with_devices(0);
        assert_eq!(config.validate(), Err(ConfigError::NoDevices));

        let config = NetworkConfig::default().with_sources(0);
        assert_eq!(config.validate(), Err(ConfigError::NoSources));

        let config = NetworkConfig::default().with_interarrival(2.0, 1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInterarrival { .. })
        ));

        let config = NetworkConfig::default().with_interarrival(0.0, 1.0);
        assert!(config.validate().is_err());

        let config = NetworkConfig::default().with_service_rate(0.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidServiceRate(0.0)));

        let config = NetworkConfig::default().with_service_rate(f64::NAN);
        assert!(config.validate().is_err());
    }
}
