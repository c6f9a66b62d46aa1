use thiserror::Error;

use super::types::DeviceId;

/// Rejected configuration, reported before an engine is built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("buffer capacity must be at least 1")]
    ZeroBufferCapacity,
    #[error("device count must be at least 1")]
    NoDevices,
    #[error("source count must be at least 1")]
    NoSources,
    #[error("inter-arrival range must satisfy 0 < min < max, got ({min}, {max})")]
    InvalidInterarrival { min: f64, max: f64 },
    #[error("service rate must be positive and finite, got {0}")]
    InvalidServiceRate(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("internal consistency violated: {0}")]
    InternalConsistency(String),
    #[error("completion scheduled for unknown device D{0}")]
    UnknownDevice(DeviceId),
}
