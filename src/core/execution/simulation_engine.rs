use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Distribution;

use crate::core::buffer::{Buffer, SlotView};
use crate::core::devices::{DevicePool, DeviceView};
use crate::core::dispatch::{AdmissionOutcome, DispatchContext, PlacementDispatcher, SelectionDispatcher};
use crate::core::errors::SimError;
use crate::core::event::Event;
use crate::core::event_log::{EventLog, LogDetail, LogKind};
use crate::core::event_scheduler::{EventHandle, EventScheduler, ScheduledEvent};
use crate::core::execution::config::{NetworkConfig, DEFAULT_MAX_TIME};
use crate::core::laws::{ExponentialService, UniformInterarrival};
use crate::core::stats::{RunSummary, Statistics};
use crate::core::types::{DeviceId, Post, PostId, SimTime, SourceId};

/// Observer trait for simulation events
pub trait SimulationObserver {
    /// Called when the simulation clock advances
    fn on_clock_advance(&mut self, old_time: SimTime, new_time: SimTime);

    /// Called after an event has been fully processed
    fn on_step_complete(&mut self, time: SimTime, event: &Event);
}

/// Discrete-event engine for the post network.
///
/// Owns the calendar, buffer, device pool, both dispatchers and the single
/// seeded random generator every draw goes through.
pub struct SimulationEngine {
    config: NetworkConfig,
    current_time: SimTime,
    scheduler: EventScheduler,
    buffer: Buffer,
    pool: DevicePool,
    interarrival: UniformInterarrival,
    service: ExponentialService,
    rng: StdRng,
    placement: PlacementDispatcher,
    selection: SelectionDispatcher,
    next_post_id: PostId,
    stats: Statistics,
    log: EventLog,
    steps_taken: u64,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl SimulationEngine {
    /// Build an engine from a validated configuration
    pub fn new(config: NetworkConfig) -> Result<Self, SimError> {
        config.validate()?;

        let (min, max) = config.interarrival;
        Ok(Self {
            current_time: 0.0,
            scheduler: EventScheduler::new(),
            buffer: Buffer::new(config.buffer_capacity),
            pool: DevicePool::new(config.device_count),
            interarrival: UniformInterarrival::new(min, max),
            service: ExponentialService::new(config.service_rate),
            rng: StdRng::seed_from_u64(config.seed),
            placement: PlacementDispatcher::new(config.direct_placement),
            selection: SelectionDispatcher::new(),
            next_post_id: 1,
            stats: Statistics::new(),
            log: EventLog::new(),
            steps_taken: 0,
            observers: Vec::new(),
            config,
        })
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Schedule one arrival per source at time 0
    pub fn bootstrap(&mut self) {
        for source in 1..=self.config.source_count {
            self.scheduler.schedule(0.0, Event::Arrival { source });
        }
        info!(
            "bootstrapped {} sources, {} devices, buffer capacity {}",
            self.config.source_count, self.config.device_count, self.config.buffer_capacity
        );
    }

    /// Process the earliest pending event, returns false if the calendar was empty
    pub fn step(&mut self) -> Result<bool, SimError> {
        let Some(ScheduledEvent {
            time,
            sequence_num,
            event,
        }) = self.scheduler.pop_next()
        else {
            return Ok(false);
        };

        let old_time = self.current_time;
        self.current_time = time;
        if old_time != time {
            for observer in &mut self.observers {
                observer.on_clock_advance(old_time, time);
            }
        }

        debug!("t={:.6} processing {}", time, event);
        match event {
            Event::Arrival { source } => self.handle_arrival(source)?,
            Event::Completion { device } => self.handle_completion(device, sequence_num)?,
        }
        self.steps_taken += 1;

        for observer in &mut self.observers {
            observer.on_step_complete(time, &event);
        }
        Ok(true)
    }

    /// Step until `max_steps` events were processed, the calendar empties,
    /// or the next event lies beyond `max_time`
    pub fn run_automatic(&mut self, max_steps: u64, max_time: SimTime) -> Result<RunSummary, SimError> {
        let mut steps = 0;
        while steps < max_steps {
            match self.scheduler.peek_time() {
                None => break,
                Some(next) if next > max_time => break,
                Some(_) => {}
            }
            if !self.step()? {
                break;
            }
            steps += 1;
        }

        let summary = self.summary();
        info!(
            "run finished after {} steps at t={:.3}: {}",
            steps, self.current_time, self.stats
        );
        Ok(summary)
    }

    /// Bulk run with the configured step budget and the default horizon
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        self.run_automatic(self.config.step_budget, DEFAULT_MAX_TIME)
    }

    fn handle_arrival(&mut self, source: SourceId) -> Result<(), SimError> {
        let now = self.current_time;
        let post = Post::new(self.next_post_id, source, now);
        self.next_post_id += 1;
        self.stats.generated += 1;

        self.log.push(
            LogKind::Arrival,
            now,
            LogDetail::new(format!("source {} generated post {}", source, post.id))
                .post(post.id)
                .source(source),
        );

        let mut ctx = DispatchContext {
            buffer: &mut self.buffer,
            pool: &mut self.pool,
            stats: &mut self.stats,
            log: &mut self.log,
        };
        let outcome = self.placement.handle_publish(post, now, &mut ctx);

        let direct_device = match outcome {
            AdmissionOutcome::Direct { device } => Some(device),
            AdmissionOutcome::Queued { .. } => {
                self.stats.queued += 1;
                None
            }
            AdmissionOutcome::Rejected { post, .. } => {
                return Err(SimError::InternalConsistency(format!(
                    "buffer refused post {} after eviction (capacity {})",
                    post.id,
                    self.buffer.capacity()
                )));
            }
        };

        let delay = self.interarrival.sample(&mut self.rng);
        self.scheduler.schedule(now + delay, Event::Arrival { source });

        if let Some(device) = direct_device {
            self.schedule_completion(device)?;
        }

        if !self.buffer.is_empty() && self.pool.any_free() {
            self.run_selection()?;
            self.ensure_pending_completions()?;
        }
        Ok(())
    }

    fn handle_completion(&mut self, device_id: DeviceId, handle: EventHandle) -> Result<(), SimError> {
        let now = self.current_time;
        let device = self
            .pool
            .get_mut(device_id)
            .ok_or(SimError::UnknownDevice(device_id))?;

        if device.pending_completion() != Some(handle) {
            warn!(
                "ignoring stale completion #{} for D{} (pending {:?})",
                handle,
                device_id,
                device.pending_completion()
            );
            return Ok(());
        }
        device.set_pending_completion(None);

        let post = device.complete();
        let detail = match &post {
            Some(post) => {
                self.stats.served += 1;
                LogDetail::new(format!("device D{} finished post {}", device_id, post.id))
                    .post(post.id)
                    .source(post.source_id)
            }
            None => {
                warn!("completion fired on idle device D{}", device_id);
                LogDetail::new(format!("device D{} finished with no post", device_id))
            }
        };
        self.log.push(LogKind::ServiceComplete, now, detail.device(device_id));

        self.run_selection()?;
        self.ensure_pending_completions()
    }

    fn run_selection(&mut self) -> Result<(), SimError> {
        let mut ctx = DispatchContext {
            buffer: &mut self.buffer,
            pool: &mut self.pool,
            stats: &mut self.stats,
            log: &mut self.log,
        };
        let started = self.selection.on_device_freed(self.current_time, &mut ctx)?;
        for device in started {
            self.schedule_completion(device)?;
        }
        Ok(())
    }

    fn schedule_completion(&mut self, device_id: DeviceId) -> Result<(), SimError> {
        let duration = self.service.sample(&mut self.rng);
        let handle = self
            .scheduler
            .schedule(self.current_time + duration, Event::Completion { device: device_id });
        self.pool
            .get_mut(device_id)
            .ok_or(SimError::UnknownDevice(device_id))?
            .set_pending_completion(Some(handle));
        Ok(())
    }

    /// Every busy device must own exactly one pending completion
    fn ensure_pending_completions(&mut self) -> Result<(), SimError> {
        let missing: Vec<DeviceId> = self
            .pool
            .iter()
            .filter(|d| d.is_busy() && d.pending_completion().is_none())
            .map(|d| d.id())
            .collect();
        for device in missing {
            warn!("D{} busy without a pending completion, scheduling one", device);
            self.schedule_completion(device)?;
        }
        Ok(())
    }

    /// Get current simulation time
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn pool(&self) -> &DevicePool {
        &self.pool
    }

    pub fn buffer_view(&self) -> Vec<SlotView> {
        self.buffer.view()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.size()
    }

    pub fn buffer_last_index(&self) -> Option<usize> {
        self.buffer.last_index()
    }

    pub fn device_view(&self) -> Vec<DeviceView> {
        self.pool.view()
    }

    pub fn device_cursor(&self) -> usize {
        self.pool.cursor()
    }

    /// Posts held by the in-flight packet, outside both buffer and devices
    pub fn packet_len(&self) -> usize {
        self.selection.packet_len()
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    pub fn calendar(&self) -> Vec<ScheduledEvent> {
        self.scheduler.pending()
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_stats(&self.stats, self.current_time, self.buffer.capacity())
    }
}
