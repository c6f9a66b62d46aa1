use super::event::Event;
use super::types::SimTime;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Insertion sequence number of a scheduled event; doubles as its handle.
pub type EventHandle = u64;

#[derive(Debug, Clone)]
pub struct ScheduledEvent {
    pub time: SimTime,
    pub sequence_num: EventHandle,
    pub event: Event,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Event calendar ordered by timestamp, FIFO among equal timestamps.
#[derive(Debug, Default)]
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
}

impl EventScheduler {
    /// Create an empty calendar
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
        }
    }

    /// Schedule an event at an absolute simulation time
    pub fn schedule(&mut self, time: SimTime, event: Event) -> EventHandle {
        let handle = self.sequence_counter;
        self.event_queue.push(ScheduledEvent {
            time,
            sequence_num: handle,
            event,
        });
        self.sequence_counter += 1;
        handle
    }

    /// Remove and return the earliest event
    pub fn pop_next(&mut self) -> Option<ScheduledEvent> {
        self.event_queue.pop()
    }

    /// Timestamp of the earliest event without removing it
    pub fn peek_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|scheduled| scheduled.time)
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.event_queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_queue.is_empty()
    }

    /// Pending events in firing order
    pub fn pending(&self) -> Vec<ScheduledEvent> {
        let mut events = self.event_queue.clone().into_sorted_vec();
        // Sorted ascending by Ord, which is reversed time order
        events.reverse();
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_time_order() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(3.0, Event::Arrival { source: 1 });
        scheduler.schedule(1.0, Event::Completion { device: 0 });
        scheduler.schedule(2.0, Event::Arrival { source: 2 });

        let times: Vec<f64> = std::iter::from_fn(|| scheduler.pop_next())
            .map(|e| e.time)
            .collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
        assert!(!scheduler.has_events());
    }

    #[test]
    fn test_equal_times_fire_in_insertion_order() {
        let mut scheduler = EventScheduler::new();
        for source in 1..=4 {
            scheduler.schedule(0.0, Event::Arrival { source });
        }
        let sources: Vec<usize> = std::iter::from_fn(|| scheduler.pop_next())
            .map(|e| match e.event {
                Event::Arrival { source } => source,
                Event::Completion { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(sources, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_handles_are_unique_and_increasing() {
        let mut scheduler = EventScheduler::new();
        let a = scheduler.schedule(5.0, Event::Completion { device: 0 });
        let b = scheduler.schedule(5.0, Event::Completion { device: 1 });
        assert!(b > a);
        assert_eq!(scheduler.peek_time(), Some(5.0));
        assert_eq!(scheduler.pop_next().unwrap().sequence_num, a);
    }

    #[test]
    fn test_pending_lists_in_firing_order() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(2.0, Event::Arrival { source: 1 });
        scheduler.schedule(0.5, Event::Completion { device: 1 });
        scheduler.schedule(2.0, Event::Completion { device: 0 });

        let pending = scheduler.pending();
        assert_eq!(pending.len(), 3);
        assert_eq!(pending[0].event, Event::Completion { device: 1 });
        assert_eq!(pending[1].event, Event::Arrival { source: 1 });
        assert_eq!(pending[2].event, Event::Completion { device: 0 });
        assert_eq!(scheduler.len(), 3);
    }
}
