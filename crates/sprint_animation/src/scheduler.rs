//! Animation scheduler
//!
//! Advances every registered timeline from one tick source. Ordering across
//! timelines within a tick is unspecified.

use crate::error::TickError;
use crate::timeline::Sprint;
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

new_key_type! {
    pub struct TimelineId;
}

/// A timeline shared between the host and the scheduler
pub type SharedSprint = Rc<RefCell<Sprint>>;

/// The animation scheduler that ticks all registered timelines
pub struct AnimationScheduler {
    timelines: SlotMap<TimelineId, SharedSprint>,
    last_frame: Option<Instant>,
    target_fps: u32,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            timelines: SlotMap::with_key(),
            last_frame: None,
            target_fps: 60,
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Time between frames at the target rate
    pub fn frame_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.target_fps as u64)
    }

    /// Register a new timeline and get a shared handle to it
    pub fn add(&mut self, sprint: Sprint) -> (TimelineId, SharedSprint) {
        let shared = Rc::new(RefCell::new(sprint));
        let id = self.timelines.insert(shared.clone());
        (id, shared)
    }

    /// Register a timeline the host already shares
    pub fn insert(&mut self, sprint: SharedSprint) -> TimelineId {
        self.timelines.insert(sprint)
    }

    pub fn get(&self, id: TimelineId) -> Option<SharedSprint> {
        self.timelines.get(id).cloned()
    }

    pub fn remove(&mut self, id: TimelineId) -> Option<SharedSprint> {
        self.timelines.remove(id)
    }

    /// Advance every timeline by `dt` seconds.
    ///
    /// A failing timeline does not stop the others; all failures are
    /// returned together.
    pub fn tick(&mut self, dt: f32) -> Result<(), TickError> {
        let mut failures = Vec::new();

        for (id, sprint) in self.timelines.iter() {
            let Ok(mut sprint) = sprint.try_borrow_mut() else {
                tracing::warn!(?id, "timeline is borrowed during tick, skipping");
                continue;
            };
            if let Err(err) = sprint.advance(dt) {
                failures.push((id, err));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(TickError { failures })
        }
    }

    /// Tick using the wall-clock time since the previous frame
    pub fn tick_frame(&mut self) -> Result<(), TickError> {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        self.tick(dt)
    }

    /// Check if any timeline is still animating
    pub fn has_active_animations(&self) -> bool {
        self.timelines
            .iter()
            .any(|(_, s)| s.try_borrow().map(|s| s.is_animating()).unwrap_or(true))
    }

    /// Iterate over all timelines
    pub fn iter(&self) -> impl Iterator<Item = (TimelineId, &SharedSprint)> {
        self.timelines.iter()
    }

    /// Get the number of timelines in the scheduler
    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}
