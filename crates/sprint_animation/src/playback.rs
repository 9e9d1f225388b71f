//! Playback engine
//!
//! At `start` the step list is compiled into segments:
//!
//! - a `Wait` step is its own segment and acts as a barrier
//! - a `Loop` step is a zero-length marker segment
//! - consecutive property steps run together in one segment whose length is
//!   that of its longest member
//!
//! A property step that would write the same property of the same node as an
//! earlier member of the current group starts a new group instead, so a
//! timeline never races against itself.
//!
//! Each member snapshots its start value when its segment begins, eases
//! toward its target while `elapsed < duration`, then writes the exact target
//! once and holds. Leftover time from a finished segment carries into the next
//! one within the same tick.
//!
//! Time inside a run is accumulated in `f64` so that many small `f32` deltas
//! summing to a step's duration complete it, however long the step is.

use crate::error::{AnimationError, Result};
use crate::step::{Channel, LoopCount, Step, StepKind};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use sprint_core::node::{AnimatedNode, NodeKey};
use sprint_core::observable::{ListenerId, Observable};
use sprint_core::Vec2;

/// Fixed slack for deciding a step is complete, in seconds. Increments that
/// sum to a duration in exact arithmetic must complete despite rounding.
pub const TIME_EPSILON: f64 = 1e-4;

/// Whether `elapsed` seconds finish a span of `duration` seconds.
///
/// On top of the fixed slack, each `f32` delta may be off by half an ulp, so
/// the accumulated error grows with the span itself.
fn reaches(elapsed: f64, duration: f32) -> bool {
    let duration = f64::from(duration);
    elapsed + TIME_EPSILON + duration * f64::from(f32::EPSILON) >= duration
}

/// Where the engine is in its current run
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Running {
        /// Index of the active segment
        segment: usize,
        /// Seconds spent in the active segment
        elapsed: f64,
    },
    Completed,
}

/// Observable "is animating" flag of one timeline
///
/// Only the engine changes it; hosts can read it and listen for changes.
#[derive(Debug)]
pub struct PlaybackState {
    animating: Observable<bool>,
}

impl PlaybackState {
    fn new() -> Self {
        Self {
            animating: Observable::new(false),
        }
    }

    pub fn get(&self) -> bool {
        self.animating.get()
    }

    /// Register a listener called with `(old, new)` on every change
    pub fn add_listener<F: FnMut(bool, bool) + 'static>(&mut self, listener: F) -> ListenerId {
        self.animating.add_listener(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.animating.remove_listener(id)
    }

    pub fn listener_count(&self) -> usize {
        self.animating.listener_count()
    }

    fn set(&mut self, value: bool) {
        self.animating.set(value);
    }
}

/// A compiled unit of playback
#[derive(Clone, Debug)]
pub(crate) enum Segment {
    Hold { duration: f32 },
    Tracks { steps: SmallVec<[Step; 4]>, duration: f32 },
    Loop { count: LoopCount },
}

impl Segment {
    pub(crate) fn duration(&self) -> f32 {
        match self {
            Segment::Hold { duration } | Segment::Tracks { duration, .. } => *duration,
            Segment::Loop { .. } => 0.0,
        }
    }
}

/// Group a step list into segments
pub(crate) fn compile(steps: &[Step]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut group: SmallVec<[Step; 4]> = SmallVec::new();
    let mut targets: FxHashSet<(NodeKey, Channel)> = FxHashSet::default();

    fn flush(
        segments: &mut Vec<Segment>,
        group: &mut SmallVec<[Step; 4]>,
        targets: &mut FxHashSet<(NodeKey, Channel)>,
    ) {
        if group.is_empty() {
            return;
        }
        let duration = group.iter().map(Step::duration).fold(0.0, f32::max);
        segments.push(Segment::Tracks {
            steps: std::mem::take(group),
            duration,
        });
        targets.clear();
    }

    for step in steps {
        match step.kind() {
            StepKind::Wait => {
                flush(&mut segments, &mut group, &mut targets);
                segments.push(Segment::Hold {
                    duration: step.duration(),
                });
            }
            StepKind::Loop(count) => {
                flush(&mut segments, &mut group, &mut targets);
                segments.push(Segment::Loop { count: *count });
            }
            _ => {
                if let Some(target) = step.target() {
                    if targets.contains(&target) {
                        flush(&mut segments, &mut group, &mut targets);
                    }
                    targets.insert(target);
                }
                group.push(step.clone());
            }
        }
    }
    flush(&mut segments, &mut group, &mut targets);

    segments
}

/// A resolved property value
#[derive(Clone, Copy, Debug, PartialEq)]
enum PropertyValue {
    Translate(Vec2),
    Scale(Vec2),
    Rotate(f32),
    Opacity(f32),
}

impl PropertyValue {
    fn lerp(self, to: PropertyValue, t: f32) -> PropertyValue {
        match (self, to) {
            (PropertyValue::Translate(a), PropertyValue::Translate(b)) => {
                PropertyValue::Translate(a.lerp(b, t))
            }
            (PropertyValue::Scale(a), PropertyValue::Scale(b)) => PropertyValue::Scale(a.lerp(b, t)),
            (PropertyValue::Rotate(a), PropertyValue::Rotate(b)) => {
                PropertyValue::Rotate(a + (b - a) * t)
            }
            (PropertyValue::Opacity(a), PropertyValue::Opacity(b)) => {
                PropertyValue::Opacity(a + (b - a) * t)
            }
            // Both ends always come from the same step
            (_, to) => to,
        }
    }

    fn write(self, node: &mut dyn AnimatedNode) -> sprint_core::node::Result<()> {
        match self {
            PropertyValue::Translate(v) => node.set_translate(v),
            PropertyValue::Scale(v) => node.set_scale(v),
            PropertyValue::Rotate(deg) => node.set_rotate(deg),
            PropertyValue::Opacity(o) => node.set_opacity(o.clamp(0.0, 1.0)),
        }
    }
}

/// Start and end values of a step, taken from the node as the step begins
fn resolve(kind: &StepKind, node: &dyn AnimatedNode) -> Option<(PropertyValue, PropertyValue)> {
    use PropertyValue::*;

    let resolved = match *kind {
        StepKind::MoveTo { dx, dy } => {
            let current = node.translate();
            (Translate(current), Translate(current + Vec2::new(dx, dy)))
        }
        StepKind::MoveFrom { dx, dy } => {
            let current = node.translate();
            (Translate(current + Vec2::new(dx, dy)), Translate(current))
        }
        StepKind::SlideFrom(edge) => {
            let current = node.translate();
            (Translate(current + edge.offscreen_offset(node)), Translate(current))
        }
        StepKind::ScaleTo { sx, sy } => (Scale(node.scale()), Scale(Vec2::new(sx, sy))),
        StepKind::ScaleFrom { sx, sy } => (Scale(Vec2::new(sx, sy)), Scale(node.scale())),
        StepKind::RotateTo { degrees } => (Rotate(node.rotate()), Rotate(degrees)),
        StepKind::FadeTo { opacity } => (Opacity(node.opacity()), Opacity(opacity)),
        StepKind::Wait | StepKind::Loop(_) => return None,
    };
    Some(resolved)
}

/// A step in flight
#[derive(Debug)]
struct Track {
    step: Step,
    from: PropertyValue,
    to: PropertyValue,
    settled: bool,
}

impl Track {
    fn write(&self, value: PropertyValue) -> Result<()> {
        let Some(node) = self.step.node() else {
            return Ok(());
        };
        let mut node = node.try_borrow_mut().map_err(|_| AnimationError::NodeBusy {
            step: self.step.kind().name(),
        })?;
        tracing::trace!(node = node.label(), ?value, "write");
        value.write(&mut *node)?;
        Ok(())
    }

    /// Write the value for `elapsed` seconds into the step
    fn apply(&mut self, elapsed: f64) -> Result<()> {
        if self.settled {
            return Ok(());
        }
        let duration = self.step.duration();
        if reaches(elapsed, duration) {
            return self.settle();
        }
        let progress = (elapsed / f64::from(duration)) as f32;
        let eased = self.step.easing().apply(progress);
        self.write(self.from.lerp(self.to, eased))
    }

    /// Write the exact target once
    fn settle(&mut self) -> Result<()> {
        if self.settled {
            return Ok(());
        }
        self.settled = true;
        self.write(self.to)
    }
}

/// Drives one timeline's compiled plan over time
#[derive(Debug, Default)]
pub struct Playback {
    plan: Vec<Segment>,
    phase: PlaybackPhase,
    tracks: SmallVec<[Track; 4]>,
    segment_started: bool,
    /// Passes left per finite loop marker, keyed by segment index
    loops_left: FxHashMap<usize, u32>,
    state: PlaybackState,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.state.get()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PlaybackState {
        &mut self.state
    }

    /// Begin a fresh run of `steps`, discarding any run in flight.
    ///
    /// The first frame is applied immediately.
    pub fn start(&mut self, steps: &[Step]) -> Result<()> {
        if matches!(self.phase, PlaybackPhase::Running { .. }) {
            tracing::debug!("restarting timeline, discarding run in flight");
        }

        self.plan = compile(steps);
        self.tracks.clear();
        self.segment_started = false;
        self.loops_left = self
            .plan
            .iter()
            .enumerate()
            .filter_map(|(i, segment)| match segment {
                Segment::Loop {
                    count: LoopCount::Times(n),
                } => Some((i, *n)),
                _ => None,
            })
            .collect();

        tracing::debug!(
            steps = steps.len(),
            segments = self.plan.len(),
            "timeline started"
        );

        self.phase = PlaybackPhase::Running {
            segment: 0,
            elapsed: 0.0,
        };
        self.state.set(true);

        self.advance(0.0)
    }

    /// Advance the run by `dt` seconds.
    ///
    /// A node adapter failure aborts the run and is returned.
    pub fn advance(&mut self, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(AnimationError::InvalidTimeStep(dt));
        }

        let result = self.run(dt);
        if let Err(err) = &result {
            tracing::warn!(error = %err, "aborting timeline after failed write");
            self.finish();
        }
        result
    }

    fn run(&mut self, dt: f32) -> Result<()> {
        let PlaybackPhase::Running {
            mut segment,
            mut elapsed,
        } = self.phase
        else {
            return Ok(());
        };

        let mut remaining = f64::from(dt);
        // Time consumed since the last jump back to the first segment
        let mut pass_time = 0.0f64;

        loop {
            let Some(current) = self.plan.get(segment) else {
                self.finish();
                return Ok(());
            };

            if let Segment::Loop { count } = current {
                let jump = match count {
                    LoopCount::Infinite => true,
                    LoopCount::Times(_) => match self.loops_left.get_mut(&segment) {
                        Some(left) if *left > 0 => {
                            *left -= 1;
                            true
                        }
                        _ => false,
                    },
                };

                if !jump {
                    segment += 1;
                    continue;
                }

                let count = *count;
                if count == LoopCount::Infinite {
                    if let Some(pass) = self.repeatable_pass(segment) {
                        if remaining >= pass {
                            let skipped = (remaining / pass).floor();
                            remaining -= skipped * pass;
                            tracing::trace!(skipped, "skipped whole loop passes");
                        }
                    }
                }

                segment = 0;
                elapsed = 0.0;
                self.segment_started = false;
                self.phase = PlaybackPhase::Running { segment, elapsed };

                // A pass with no duration would spin forever inside one tick
                if pass_time <= TIME_EPSILON && count == LoopCount::Infinite {
                    return Ok(());
                }
                pass_time = 0.0;
                continue;
            }

            if !self.segment_started {
                self.begin_segment(segment)?;
            }

            let duration = self.plan[segment].duration();
            let local = elapsed + remaining;

            if reaches(local, duration) {
                for track in self.tracks.iter_mut() {
                    track.settle()?;
                }
                self.tracks.clear();
                self.segment_started = false;

                remaining = (local - f64::from(duration)).max(0.0);
                pass_time += f64::from(duration);
                segment += 1;
                elapsed = 0.0;
                self.phase = PlaybackPhase::Running { segment, elapsed };
                continue;
            }

            elapsed = local;
            for track in self.tracks.iter_mut() {
                track.apply(elapsed)?;
            }
            self.phase = PlaybackPhase::Running { segment, elapsed };
            return Ok(());
        }
    }

    /// Length of one pass back to the loop marker at `marker`, when every pass
    /// ends in the same state and can be skipped without writing it.
    ///
    /// Relative moves accumulate across passes, and finite loops before the
    /// marker that still have passes left change the pass length, so neither
    /// allows skipping.
    fn repeatable_pass(&self, marker: usize) -> Option<f64> {
        let mut pass = 0.0f64;
        for (index, segment) in self.plan[..marker].iter().enumerate() {
            match segment {
                Segment::Hold { duration } => pass += f64::from(*duration),
                Segment::Tracks { steps, duration } => {
                    if steps
                        .iter()
                        .any(|step| matches!(step.kind(), StepKind::MoveTo { .. }))
                    {
                        return None;
                    }
                    pass += f64::from(*duration);
                }
                Segment::Loop {
                    count: LoopCount::Infinite,
                } => return None,
                Segment::Loop { .. } => {
                    if self.loops_left.get(&index).is_some_and(|left| *left > 0) {
                        return None;
                    }
                }
            }
        }
        (pass > TIME_EPSILON).then_some(pass)
    }

    fn begin_segment(&mut self, index: usize) -> Result<()> {
        self.tracks.clear();
        self.segment_started = true;

        let Segment::Tracks { steps, .. } = &self.plan[index] else {
            tracing::debug!(segment = index, "hold started");
            return Ok(());
        };

        for step in steps {
            let Some(node) = step.node() else {
                continue;
            };
            let node = node.try_borrow().map_err(|_| AnimationError::NodeBusy {
                step: step.kind().name(),
            })?;
            if let Some((from, to)) = resolve(step.kind(), &*node) {
                self.tracks.push(Track {
                    step: step.clone(),
                    from,
                    to,
                    settled: false,
                });
            }
        }

        tracing::debug!(segment = index, tracks = self.tracks.len(), "segment started");
        Ok(())
    }

    fn finish(&mut self) {
        self.tracks.clear();
        self.segment_started = false;
        self.phase = PlaybackPhase::Completed;
        tracing::debug!("timeline completed");
        self.state.set(false);
    }
}
