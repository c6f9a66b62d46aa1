use serde::{Deserialize, Serialize};

use super::types::{DeviceId, SourceId};

/// Calendar entry payload. The scheduler matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A source generates its next post
    Arrival { source: SourceId },
    /// A device finishes its current post
    Completion { device: DeviceId },
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Arrival { source } => write!(f, "Arrival(source {})", source),
            Event::Completion { device } => write!(f, "Completion(D{})", device),
        }
    }
}
