pub mod buffer;
pub mod devices;
pub mod dispatch;
pub mod errors;
pub mod event;
pub mod event_log;
pub mod event_scheduler;
pub mod execution;
pub mod laws;
pub mod stats;
pub mod types;
