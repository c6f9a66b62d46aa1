use serde::{Deserialize, Serialize};

use super::event_scheduler::EventHandle;
use super::types::{DeviceId, Post, PostId};

/// A server processing at most one post at a time.
#[derive(Debug)]
pub struct Device {
    id: DeviceId,
    current_post: Option<Post>,
    /// Calendar handle of this device's outstanding completion
    pending_completion: Option<EventHandle>,
}

impl Device {
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            current_post: None,
            pending_completion: None,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn is_busy(&self) -> bool {
        self.current_post.is_some()
    }

    pub fn is_free(&self) -> bool {
        !self.is_busy()
    }

    pub fn current_post(&self) -> Option<&Post> {
        self.current_post.as_ref()
    }

    /// Takes ownership of `post`. The device must be free.
    pub fn start_process(&mut self, post: Post) {
        debug_assert!(self.is_free(), "device {} already busy", self.id);
        self.current_post = Some(post);
    }

    /// Releases the current post, if any.
    pub fn complete(&mut self) -> Option<Post> {
        self.current_post.take()
    }

    pub fn pending_completion(&self) -> Option<EventHandle> {
        self.pending_completion
    }

    pub(crate) fn set_pending_completion(&mut self, handle: Option<EventHandle>) {
        self.pending_completion = handle;
    }

    pub fn view(&self) -> DeviceView {
        DeviceView {
            id: self.id,
            busy: self.is_busy(),
            post: self.current_post.as_ref().map(|p| p.id),
        }
    }
}

/// Read-only snapshot of a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceView {
    pub id: DeviceId,
    pub busy: bool,
    pub post: Option<PostId>,
}

impl std::fmt::Display for DeviceView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.post {
            Some(post) if self.busy => write!(f, "D{}=BUSY({})", self.id, post),
            _ => write!(f, "D{}=FREE", self.id),
        }
    }
}

/// Fixed set of devices served round-robin from a rotating cursor.
#[derive(Debug)]
pub struct DevicePool {
    devices: Vec<Device>,
    cursor: usize,
}

impl DevicePool {
    pub fn new(count: usize) -> Self {
        Self {
            devices: (0..count).map(Device::new).collect(),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the first free device at or after the cursor, scanning
    /// circularly, and moves the cursor just past it.
    pub fn pick_free(&mut self) -> Option<&mut Device> {
        let n = self.devices.len();
        let idx = (0..n)
            .map(|k| (self.cursor + k) % n)
            .find(|&i| self.devices[i].is_free())?;
        self.cursor = (idx + 1) % n;
        Some(&mut self.devices[idx])
    }

    pub fn any_free(&self) -> bool {
        self.devices.iter().any(Device::is_free)
    }

    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn get_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.devices.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Device> {
        self.devices.iter_mut()
    }

    pub fn view(&self) -> Vec<DeviceView> {
        self.devices.iter().map(Device::view).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_free_is_round_robin() {
        let mut pool = DevicePool::new(3);
        let mut order = Vec::new();
        for _ in 0..6 {
            let device = pool.pick_free().unwrap();
            order.push(device.id());
        }
        // Devices are never marked busy here, so the cycle repeats
        assert_eq!(order, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_pick_free_skips_busy_and_advances_cursor() {
        let mut pool = DevicePool::new(3);
        pool.get_mut(0).unwrap().start_process(Post::new(1, 1, 0.0));

        let picked = pool.pick_free().unwrap();
        assert_eq!(picked.id(), 1);
        picked.start_process(Post::new(2, 1, 0.0));
        assert_eq!(pool.cursor(), 2);

        let picked = pool.pick_free().unwrap();
        assert_eq!(picked.id(), 2);
        picked.start_process(Post::new(3, 1, 0.0));
        assert_eq!(pool.cursor(), 0);

        assert!(pool.pick_free().is_none());
        assert!(!pool.any_free());
        // Cursor untouched on a failed pick
        assert_eq!(pool.cursor(), 0);
    }

    #[test]
    fn test_each_device_once_per_cycle_from_cursor() {
        let mut pool = DevicePool::new(4);
        pool.pick_free().unwrap();
        pool.pick_free().unwrap();
        assert_eq!(pool.cursor(), 2);

        let mut seen = Vec::new();
        for _ in 0..4 {
            let device = pool.pick_free().unwrap();
            seen.push(device.id());
            device.start_process(Post::new(seen.len() as u64, 1, 0.0));
        }
        assert_eq!(seen, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_complete_releases_post() {
        let mut device = Device::new(0);
        assert!(device.complete().is_none());
        device.start_process(Post::new(9, 2, 1.0));
        assert!(device.is_busy());
        assert_eq!(device.view().to_string(), "D0=BUSY(9)");
        let post = device.complete().unwrap();
        assert_eq!(post.id, 9);
        assert!(device.is_free());
        assert_eq!(device.view().to_string(), "D0=FREE");
    }

    #[test]
    fn test_empty_pool_has_nothing_free() {
        let mut pool = DevicePool::new(0);
        assert!(pool.is_empty());
        assert!(pool.pick_free().is_none());
        assert!(!pool.any_free());
    }
}
