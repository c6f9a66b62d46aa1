use serde::{Deserialize, Serialize};

use super::types::{Post, PostId, SimTime};

/// One fixed position in the buffer.
#[derive(Debug, Default)]
pub struct BufferSlot {
    post: Option<Post>,
    enqueued_at: SimTime,
}

impl BufferSlot {
    pub fn is_empty(&self) -> bool {
        self.post.is_none()
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn enqueued_at(&self) -> SimTime {
        self.enqueued_at
    }

    fn take(&mut self) -> Option<Post> {
        self.enqueued_at = 0.0;
        self.post.take()
    }
}

/// Read-only snapshot of a slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotView {
    pub index: usize,
    pub post: Option<PostId>,
    pub enqueued_at: SimTime,
}

/// Bounded buffer with ring-probe admission, oldest-first eviction and
/// newest-first extraction.
#[derive(Debug)]
pub struct Buffer {
    slots: Vec<BufferSlot>,
    last_index: Option<usize>,
    size: usize,
}

impl Buffer {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, BufferSlot::default);
        Self {
            slots,
            last_index: None,
            size: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Slot most recently written, `None` before the first insertion.
    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    /// Writes `post` into the first empty slot found probing circularly from
    /// just after `last_index`.
    ///
    /// Hands the post back as `Err` when no slot is free, so the caller keeps
    /// ownership.
    pub fn enqueue(&mut self, post: Post, now: SimTime) -> Result<usize, Post> {
        let capacity = self.capacity();
        if self.is_full() {
            return Err(post);
        }

        let start = self.last_index.map_or(0, |i| (i + 1) % capacity);
        let found = (0..capacity)
            .map(|k| (start + k) % capacity)
            .find(|&idx| self.slots[idx].is_empty());

        match found {
            Some(idx) => {
                let slot = &mut self.slots[idx];
                slot.post = Some(post);
                slot.enqueued_at = now;
                self.last_index = Some(idx);
                self.size += 1;
                Ok(idx)
            }
            None => Err(post),
        }
    }

    /// Evicts the occupant with the smallest `enqueued_at`; the lowest slot
    /// index wins ties.
    pub fn drop_oldest(&mut self) -> Option<Post> {
        let idx = self.find_occupied(|candidate, best| candidate < best)?;
        self.remove_at(idx)
    }

    /// Extracts the occupant with the largest `enqueued_at`; the lowest slot
    /// index wins ties.
    pub fn pick_newest(&mut self) -> Option<Post> {
        let idx = self.find_occupied(|candidate, best| candidate > best)?;
        self.remove_at(idx)
    }

    pub fn slots(&self) -> &[BufferSlot] {
        &self.slots
    }

    pub fn view(&self) -> Vec<SlotView> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| SlotView {
                index,
                post: slot.post().map(|p| p.id),
                enqueued_at: slot.enqueued_at,
            })
            .collect()
    }

    /// Linear scan keeping the first occupied slot for which `better`
    /// holds strictly against the current best.
    fn find_occupied<F>(&self, better: F) -> Option<usize>
    where
        F: Fn(SimTime, SimTime) -> bool,
    {
        let mut best: Option<(usize, SimTime)> = None;
        for (idx, slot) in self.slots.iter().enumerate() {
            if slot.is_empty() {
                continue;
            }
            match best {
                Some((_, t)) if !better(slot.enqueued_at, t) => {}
                _ => best = Some((idx, slot.enqueued_at)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    fn remove_at(&mut self, idx: usize) -> Option<Post> {
        let post = self.slots[idx].take()?;
        self.size -= 1;
        Some(post)
    }
}
