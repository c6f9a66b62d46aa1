pub mod config;
pub mod simulation_engine;

// Re-export commonly used types
pub use config::{NetworkConfig, DEFAULT_MAX_TIME};
pub use simulation_engine::{SimulationEngine, SimulationObserver};
