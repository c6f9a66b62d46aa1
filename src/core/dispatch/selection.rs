use log::debug;

use super::DispatchContext;
use crate::core::errors::SimError;
use crate::core::event_log::{LogDetail, LogKind};
use crate::core::types::{DeviceId, Post, SimTime, SourceId};

/// Spacing of the synthetic timestamps given to requeued posts
pub const REQUEUE_EPSILON: SimTime = 1e-6;

/// Same-source batch pulled out of the buffer, newest first.
#[derive(Debug)]
pub struct Packet {
    pub source_id: SourceId,
    pub posts: Vec<Post>,
}

impl Packet {
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Batching policy run when a device frees up.
///
/// Keeps at most one in-flight [`Packet`] between calls. A new packet is
/// formed from the newest buffered post's source; posts from other sources
/// go back into the buffer.
#[derive(Debug, Default)]
pub struct SelectionDispatcher {
    packet: Option<Packet>,
}

impl SelectionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn packet(&self) -> Option<&Packet> {
        self.packet.as_ref()
    }

    /// Posts still waiting in the in-flight packet
    pub fn packet_len(&self) -> usize {
        self.packet.as_ref().map_or(0, Packet::len)
    }

    /// Feeds free devices from the current packet, forming a new one first
    /// if needed. Returns the devices that started service, in order.
    pub fn on_device_freed(
        &mut self,
        now: SimTime,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<DeviceId>, SimError> {
        if self.packet.as_ref().map_or(true, Packet::is_empty) {
            match Self::form_packet(now, ctx)? {
                Some(packet) => self.packet = Some(packet),
                None => return Ok(Vec::new()),
            }
        }

        let mut started = Vec::new();
        if let Some(packet) = self.packet.as_mut() {
            while !packet.posts.is_empty() {
                let Some(device) = ctx.pool.pick_free() else {
                    break;
                };
                let Some(post) = packet.posts.pop() else {
                    break;
                };
                let device_id = device.id();
                ctx.log.push(
                    LogKind::ServiceStart,
                    now,
                    LogDetail::new(format!(
                        "post {} from source {} packet sent to device D{}",
                        post.id, post.source_id, device_id
                    ))
                    .post(post.id)
                    .source(post.source_id)
                    .device(device_id),
                );
                debug!("{} started on D{}", post, device_id);
                device.start_process(post);
                started.push(device_id);
            }
        }

        if self.packet.as_ref().map_or(false, Packet::is_empty) {
            self.packet = None;
        }
        Ok(started)
    }

    /// Drains the buffer newest-first, keeps the seed source's posts and
    /// requeues the rest with strictly increasing synthetic timestamps.
    fn form_packet(now: SimTime, ctx: &mut DispatchContext<'_>) -> Result<Option<Packet>, SimError> {
        let Some(seed) = ctx.buffer.pick_newest() else {
            return Ok(None);
        };
        ctx.log.push(
            LogKind::BufferPick,
            now,
            LogDetail::new(format!("newest post {} picked from buffer", seed.id))
                .post(seed.id)
                .source(seed.source_id),
        );

        let source_id = seed.source_id;
        let mut pulled = vec![seed];
        while let Some(post) = ctx.buffer.pick_newest() {
            pulled.push(post);
        }

        let (same, other): (Vec<Post>, Vec<Post>) =
            pulled.into_iter().partition(|p| p.source_id == source_id);

        let mut t = now;
        for post in other.into_iter().rev() {
            let (post_id, post_source) = (post.id, post.source_id);
            if let Err(post) = ctx.buffer.enqueue(post, t) {
                return Err(SimError::InternalConsistency(format!(
                    "requeue of post {} failed with {} of {} slots used",
                    post.id,
                    ctx.buffer.size(),
                    ctx.buffer.capacity()
                )));
            }
            ctx.log.push(
                LogKind::BufferRequeue,
                now,
                LogDetail::new(format!(
                    "post {} returned to buffer (not part of source {} packet)",
                    post_id, source_id
                ))
                .post(post_id)
                .source(post_source),
            );
            t += REQUEUE_EPSILON;
        }

        let mut detail = LogDetail::new(format!(
            "packet of {} posts formed for source {}",
            same.len(),
            source_id
        ))
        .source(source_id)
        .packet_size(same.len());
        if let Some(last) = same.last() {
            detail = detail.post(last.id);
        }
        ctx.log.push(LogKind::PacketFormed, now, detail);
        debug!("packet formed: source {} x{}", source_id, same.len());

        Ok(Some(Packet {
            source_id,
            posts: same,
        }))
    }
}
