use serde::{Deserialize, Serialize};

use super::types::SimTime;

/// Run-wide counters, zeroed at construction and only ever incremented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub generated: u64,
    pub queued: u64,
    pub served: u64,
    pub evicted: u64,
    pub direct: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of generated posts lost to eviction, in percent
    pub fn reject_pct(&self) -> f64 {
        if self.generated == 0 {
            0.0
        } else {
            self.evicted as f64 / self.generated as f64 * 100.0
        }
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "gen={} queued={} served={} evicted={} direct={} ({:.1}% rejected)",
            self.generated,
            self.queued,
            self.served,
            self.evicted,
            self.direct,
            self.reject_pct()
        )
    }
}

/// Result record of a bulk run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated: u64,
    pub queued: u64,
    pub served: u64,
    pub evicted: u64,
    pub direct: u64,
    pub reject_pct: f64,
    pub final_time: SimTime,
    pub buffer_capacity: usize,
}

impl RunSummary {
    pub fn from_stats(stats: &Statistics, final_time: SimTime, buffer_capacity: usize) -> Self {
        Self {
            generated: stats.generated,
            queued: stats.queued,
            served: stats.served,
            evicted: stats.evicted,
            direct: stats.direct,
            reject_pct: stats.reject_pct(),
            final_time,
            buffer_capacity,
        }
    }

    /// Label/value rows in display order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("generated", self.generated.to_string()),
            ("queued", self.queued.to_string()),
            ("served", self.served.to_string()),
            ("evicted", self.evicted.to_string()),
            ("direct", self.direct.to_string()),
            ("reject_pct", format!("{:.2}", self.reject_pct)),
            ("final_time", format!("{:.3}", self.final_time)),
            ("buffer_capacity", self.buffer_capacity.to_string()),
        ]
    }
}
