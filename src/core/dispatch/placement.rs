use log::debug;

use super::DispatchContext;
use crate::core::event_log::{LogDetail, LogKind};
use crate::core::types::{DeviceId, Post, PostId, SimTime};

/// Where an arriving post ended up
#[derive(Debug, PartialEq)]
pub enum AdmissionOutcome {
    /// Handed straight to a free device, bypassing the buffer
    Direct { device: DeviceId },
    /// Written into the buffer, possibly after evicting the oldest occupant
    Queued { slot: usize, evicted: Option<PostId> },
    /// The buffer refused the post even after eviction; the post is returned
    Rejected { post: Post, evicted: Option<PostId> },
}

impl AdmissionOutcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, AdmissionOutcome::Queued { .. })
    }

    pub fn assigned_device(&self) -> Option<DeviceId> {
        match self {
            AdmissionOutcome::Direct { device } => Some(*device),
            _ => None,
        }
    }

    pub fn evicted(&self) -> Option<PostId> {
        match self {
            AdmissionOutcome::Direct { .. } => None,
            AdmissionOutcome::Queued { evicted, .. } | AdmissionOutcome::Rejected { evicted, .. } => {
                *evicted
            }
        }
    }
}

/// Admission policy applied on arrival.
#[derive(Debug, Clone, Copy)]
pub struct PlacementDispatcher {
    direct: bool,
}

impl PlacementDispatcher {
    pub fn new(direct: bool) -> Self {
        Self { direct }
    }

    pub fn is_direct(&self) -> bool {
        self.direct
    }

    pub fn handle_publish(&self, post: Post, now: SimTime, ctx: &mut DispatchContext<'_>) -> AdmissionOutcome {
        let post = if self.direct {
            match ctx.pool.pick_free() {
                Some(device) => {
                    let device_id = device.id();
                    ctx.log.push(
                        LogKind::AssignToDevice,
                        now,
                        LogDetail::new(format!(
                            "post {} sent straight to device D{} (buffer bypassed)",
                            post.id, device_id
                        ))
                        .post(post.id)
                        .source(post.source_id)
                        .device(device_id),
                    );
                    debug!("{} assigned directly to D{}", post, device_id);
                    device.start_process(post);
                    ctx.stats.direct += 1;
                    return AdmissionOutcome::Direct { device: device_id };
                }
                None => post,
            }
        } else {
            post
        };

        let mut evicted = None;
        if ctx.buffer.is_full() {
            if let Some(dropped) = ctx.buffer.drop_oldest() {
                ctx.stats.evicted += 1;
                ctx.log.push(
                    LogKind::BufferEvict,
                    now,
                    LogDetail::new(format!("buffer full: oldest post {} evicted", dropped.id))
                        .post(dropped.id)
                        .source(dropped.source_id),
                );
                debug!("buffer full, evicted {}", dropped);
                evicted = Some(dropped.id);
            }
        }

        let (post_id, source_id) = (post.id, post.source_id);
        match ctx.buffer.enqueue(post, now) {
            Ok(slot) => {
                ctx.log.push(
                    LogKind::BufferEnqueue,
                    now,
                    LogDetail::new(format!("post {} enqueued in slot {} (ring probe)", post_id, slot))
                        .post(post_id)
                        .source(source_id),
                );
                AdmissionOutcome::Queued { slot, evicted }
            }
            Err(post) => AdmissionOutcome::Rejected { post, evicted },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::Buffer;
    use crate::core::devices::DevicePool;
    use crate::core::event_log::EventLog;
    use crate::core::stats::Statistics;

    struct Fixture {
        buffer: Buffer,
        pool: DevicePool,
        stats: Statistics,
        log: EventLog,
    }

    impl Fixture {
        fn new(capacity: usize, devices: usize) -> Self {
            Self {
                buffer: Buffer::new(capacity),
                pool: DevicePool::new(devices),
                stats: Statistics::new(),
                log: EventLog::new(),
            }
        }

        fn ctx(&mut self) -> DispatchContext<'_> {
            DispatchContext {
                buffer: &mut self.buffer,
                pool: &mut self.pool,
                stats: &mut self.stats,
                log: &mut self.log,
            }
        }
    }

    #[test]
    fn test_direct_mode_uses_free_device() {
        let mut fx = Fixture::new(2, 1);
        let placement = PlacementDispatcher::new(true);

        let outcome = placement.handle_publish(Post::new(1, 1, 0.0), 0.0, &mut fx.ctx());
        assert_eq!(outcome, AdmissionOutcome::Direct { device: 0 });
        assert!(fx.buffer.is_empty());
        assert_eq!(fx.stats.direct, 1);
        assert_eq!(fx.log.count(LogKind::AssignToDevice), 1);

        // Device now busy: falls back to the buffer
        let outcome = placement.handle_publish(Post::new(2, 1, 1.0), 1.0, &mut fx.ctx());
        assert!(outcome.is_queued());
        assert_eq!(fx.buffer.size(), 1);
        assert_eq!(fx.stats.direct, 1);
    }

    #[test]
    fn test_buffered_mode_ignores_free_devices() {
        let mut fx = Fixture::new(2, 3);
        let placement = PlacementDispatcher::new(false);
        let outcome = placement.handle_publish(Post::new(1, 1, 0.0), 0.0, &mut fx.ctx());
        assert_eq!(outcome, AdmissionOutcome::Queued { slot: 0, evicted: None });
        assert!(fx.pool.any_free());
        assert_eq!(fx.stats.direct, 0);
    }

    #[test]
    fn test_full_buffer_evicts_oldest_first() {
        let mut fx = Fixture::new(1, 1);
        let placement = PlacementDispatcher::new(false);

        placement.handle_publish(Post::new(1, 1, 0.0), 0.0, &mut fx.ctx());
        let outcome = placement.handle_publish(Post::new(2, 1, 0.5), 0.5, &mut fx.ctx());

        assert_eq!(outcome.evicted(), Some(1));
        assert!(outcome.is_queued());
        assert_eq!(fx.stats.evicted, 1);
        assert_eq!(fx.buffer.view()[0].post, Some(2));

        let kinds: Vec<LogKind> = fx.log.records().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![LogKind::BufferEnqueue, LogKind::BufferEvict, LogKind::BufferEnqueue]
        );
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut fx = Fixture::new(0, 1);
        let placement = PlacementDispatcher::new(false);
        match placement.handle_publish(Post::new(1, 1, 0.0), 0.0, &mut fx.ctx()) {
            AdmissionOutcome::Rejected { post, evicted } => {
                assert_eq!(post.id, 1);
                assert_eq!(evicted, None);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
