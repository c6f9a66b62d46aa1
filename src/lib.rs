pub mod core;

// Re-export commonly used types
pub use crate::core::errors::{ConfigError, SimError};
pub use crate::core::event::Event;
pub use crate::core::event_log::{EventLog, LogDetail, LogKind, LogRecord};
pub use crate::core::execution::{NetworkConfig, SimulationEngine, SimulationObserver, DEFAULT_MAX_TIME};
pub use crate::core::stats::{RunSummary, Statistics};
pub use crate::core::types::{DeviceId, Post, PostId, SimTime, SourceId};
