//! Admission and service policies.
//!
//! [`PlacementDispatcher`] runs once per arrival; [`SelectionDispatcher`]
//! runs whenever a device frees up or sits idle next to queued work.

pub mod placement;
pub mod selection;

pub use placement::{AdmissionOutcome, PlacementDispatcher};
pub use selection::{Packet, SelectionDispatcher};

use super::buffer::Buffer;
use super::devices::DevicePool;
use super::event_log::EventLog;
use super::stats::Statistics;

/// Mutable engine state a dispatcher may touch during one call
pub struct DispatchContext<'a> {
    pub buffer: &'a mut Buffer,
    pub pool: &'a mut DevicePool,
    pub stats: &'a mut Statistics,
    pub log: &'a mut EventLog,
}
