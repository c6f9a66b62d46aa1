//! Append-only record of everything the engine did.
//!
//! Front ends poll it with a cursor: keep `len()` from the last read and ask
//! for [`EventLog::since`] next time.

use serde::{Deserialize, Serialize};

use super::types::{DeviceId, PostId, SimTime, SourceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogKind {
    Arrival,
    AssignToDevice,
    BufferEvict,
    BufferEnqueue,
    BufferRequeue,
    BufferPick,
    PacketFormed,
    ServiceStart,
    ServiceComplete,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Arrival => "ARRIVAL",
            LogKind::AssignToDevice => "ASSIGN_TO_DEVICE",
            LogKind::BufferEvict => "BUFFER_EVICT",
            LogKind::BufferEnqueue => "BUFFER_ENQUEUE",
            LogKind::BufferRequeue => "BUFFER_REQUEUE",
            LogKind::BufferPick => "BUFFER_PICK",
            LogKind::PacketFormed => "PACKET_FORMED",
            LogKind::ServiceStart => "SERVICE_START",
            LogKind::ServiceComplete => "SERVICE_COMPLETE",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogDetail {
    pub post: Option<PostId>,
    pub source: Option<SourceId>,
    pub device: Option<DeviceId>,
    pub packet_size: Option<usize>,
    pub action: String,
}

impl LogDetail {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn post(mut self, post: PostId) -> Self {
        self.post = Some(post);
        self
    }

    pub fn source(mut self, source: SourceId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn device(mut self, device: DeviceId) -> Self {
        self.device = Some(device);
        self
    }

    pub fn packet_size(mut self, size: usize) -> Self {
        self.packet_size = Some(size);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub kind: LogKind,
    pub time: SimTime,
    pub detail: LogDetail,
}

impl std::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>10.3}  {:<16}  {}", self.time, self.kind, self.detail.action)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<LogRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: LogKind, time: SimTime, detail: LogDetail) {
        self.records.push(LogRecord { kind, time, detail });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Records appended after `cursor`; an out-of-range cursor yields nothing.
    pub fn since(&self, cursor: usize) -> &[LogRecord] {
        self.records.get(cursor..).unwrap_or(&[])
    }

    pub fn count(&self, kind: LogKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_returns_new_records_only() {
        let mut log = EventLog::new();
        log.push(LogKind::Arrival, 0.0, LogDetail::new("a").post(1).source(1));
        let cursor = log.len();
        log.push(LogKind::BufferEnqueue, 0.0, LogDetail::new("b").post(1));
        log.push(LogKind::ServiceStart, 0.0, LogDetail::new("c").device(0));

        let fresh = log.since(cursor);
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh[0].kind, LogKind::BufferEnqueue);
        assert!(log.since(log.len()).is_empty());
        assert!(log.since(100).is_empty());
    }

    #[test]
    fn test_count_by_kind_and_display() {
        let mut log = EventLog::new();
        log.push(LogKind::Arrival, 1.5, LogDetail::new("source 1 generated post 1"));
        log.push(LogKind::Arrival, 2.0, LogDetail::new("source 2 generated post 2"));
        assert_eq!(log.count(LogKind::Arrival), 2);
        assert_eq!(log.count(LogKind::BufferEvict), 0);
        let line = log.records()[0].to_string();
        assert!(line.contains("ARRIVAL"));
        assert!(line.contains("1.500"));
    }
}
