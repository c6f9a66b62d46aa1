use serde::{Deserialize, Serialize};

/// Simulation clock value
pub type SimTime = f64;

/// Unique, monotonically assigned post identifier
pub type PostId = u64;

/// Source identifier in `1..=source_count`
pub type SourceId = usize;

/// Device identifier, equal to the device's index in the pool
pub type DeviceId = usize;

/// A unit of work generated by a source.
///
/// Posts are never cloned inside the engine: whichever structure holds one
/// (a buffer slot, a device, or the in-flight packet) owns it.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub source_id: SourceId,
    pub created_at: SimTime,
}

impl Post {
    pub fn new(id: PostId, source_id: SourceId, created_at: SimTime) -> Self {
        Self {
            id,
            source_id,
            created_at,
        }
    }
}

impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}(src {})", self.id, self.source_id)
    }
}
