//! Fluent timeline builder
//!
//! A [`Sprint`] accumulates steps against the currently bound node and
//! easing, then plays them with [`Sprint::sprint`].
//!
//! ```rust
//! use sprint_animation::{EasingFamily, Sprint};
//! use sprint_core::{AnimatedNode, Rect, SceneNode, Size};
//!
//! # fn main() -> Result<(), sprint_animation::AnimationError> {
//! let title = SceneNode::new("title", Rect::new(100.0, 40.0, 300.0, 60.0), Size::new(800.0, 600.0))
//!     .shared();
//!
//! let mut sprint = Sprint::new(title.clone());
//! sprint
//!     .set_interpolator(EasingFamily::Elastic)
//!     .wait(0.5)?
//!     .slide_from_left(2.0)?
//!     .rotate_to(2.0, 360.0)?
//!     .sprint()?;
//!
//! sprint.advance(2.5)?;
//! assert!(!sprint.is_animating());
//! assert_eq!(title.borrow().rotate(), 360.0);
//! # Ok(())
//! # }
//! ```
//!
//! Steps keep the node and easing that were active when they were appended.
//! Calling `sprint()` again restarts from the first step of the list as it
//! is at that moment.

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::playback::{self, Playback, PlaybackPhase, PlaybackState};
use crate::step::{Edge, LoopCount, Step, StepKind};
use sprint_core::node::SharedNode;
use sprint_core::observable::ListenerId;
use std::fmt;

/// A chainable animation timeline bound to one node at a time
#[derive(Default)]
pub struct Sprint {
    steps: Vec<Step>,
    node: Option<SharedNode>,
    easing: Easing,
    playback: Playback,
}

impl Sprint {
    /// Create a builder bound to `node`
    pub fn new(node: SharedNode) -> Self {
        Self {
            node: Some(node),
            ..Self::default()
        }
    }

    /// Create a builder with no node; every step fails until `set_node`
    pub fn unbound() -> Self {
        Self::default()
    }

    // =========================================================================
    // Build-time context
    // =========================================================================

    /// Bind the node used by steps appended from now on
    pub fn set_node(&mut self, node: SharedNode) -> &mut Self {
        self.node = Some(node);
        self
    }

    /// Set the easing used by steps appended from now on
    pub fn set_interpolator(&mut self, easing: impl Into<Easing>) -> &mut Self {
        self.easing = easing.into();
        self
    }

    pub fn node(&self) -> Option<&SharedNode> {
        self.node.as_ref()
    }

    pub fn interpolator(&self) -> Easing {
        self.easing
    }

    // =========================================================================
    // Steps
    // =========================================================================

    /// Translate by (dx, dy) from wherever the node is when the step begins
    pub fn move_to(&mut self, duration: f32, dx: f32, dy: f32) -> Result<&mut Self> {
        self.push(StepKind::MoveTo { dx, dy }, duration)
    }

    /// Appear displaced by (dx, dy) and return to the current translation
    pub fn move_from(&mut self, duration: f32, dx: f32, dy: f32) -> Result<&mut Self> {
        self.push(StepKind::MoveFrom { dx, dy }, duration)
    }

    pub fn slide_from_left(&mut self, duration: f32) -> Result<&mut Self> {
        self.push(StepKind::SlideFrom(Edge::Left), duration)
    }

    pub fn slide_from_right(&mut self, duration: f32) -> Result<&mut Self> {
        self.push(StepKind::SlideFrom(Edge::Right), duration)
    }

    pub fn slide_from_top(&mut self, duration: f32) -> Result<&mut Self> {
        self.push(StepKind::SlideFrom(Edge::Top), duration)
    }

    pub fn slide_from_bottom(&mut self, duration: f32) -> Result<&mut Self> {
        self.push(StepKind::SlideFrom(Edge::Bottom), duration)
    }

    pub fn scale_to(&mut self, duration: f32, sx: f32, sy: f32) -> Result<&mut Self> {
        self.push(StepKind::ScaleTo { sx, sy }, duration)
    }

    /// Start at scale (sx, sy) and return to the current scale
    pub fn scale_from(&mut self, duration: f32, sx: f32, sy: f32) -> Result<&mut Self> {
        self.push(StepKind::ScaleFrom { sx, sy }, duration)
    }

    /// Rotate to an absolute angle in degrees
    pub fn rotate_to(&mut self, duration: f32, degrees: f32) -> Result<&mut Self> {
        self.push(StepKind::RotateTo { degrees }, duration)
    }

    pub fn fade_to(&mut self, duration: f32, opacity: f32) -> Result<&mut Self> {
        self.push(StepKind::FadeTo { opacity }, duration)
    }

    /// Pause; steps after a wait start only once everything before it is done
    pub fn wait(&mut self, duration: f32) -> Result<&mut Self> {
        self.push(StepKind::Wait, duration)
    }

    /// Repeat everything appended so far `count` more times, or forever when
    /// `count` is 0, and play the timeline from the start
    pub fn repeat(&mut self, count: i32) -> Result<&mut Self> {
        let count = u32::try_from(count).map_err(|_| AnimationError::InvalidLoopCount(count))?;
        self.steps.push(Step::new(
            StepKind::Loop(LoopCount::from_count(count)),
            0.0,
            self.easing,
            None,
        ));
        self.sprint()
    }

    fn push(&mut self, kind: StepKind, duration: f32) -> Result<&mut Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(AnimationError::InvalidDuration(duration));
        }
        let Some(node) = self.node.clone() else {
            return Err(AnimationError::UnboundNode { step: kind.name() });
        };

        self.steps.push(Step::new(kind, duration, self.easing, Some(node)));
        Ok(self)
    }

    /// Drop every accumulated step. A run in flight keeps playing.
    pub fn clear(&mut self) -> &mut Self {
        self.steps.clear();
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Length in seconds of one pass over the current steps, ignoring loops
    pub fn duration(&self) -> f32 {
        playback::compile(&self.steps)
            .iter()
            .map(|segment| segment.duration())
            .sum()
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Play the current steps from the start, cancelling any run in flight
    pub fn sprint(&mut self) -> Result<&mut Self> {
        self.playback.start(&self.steps)?;
        Ok(self)
    }

    /// Advance playback by `dt` seconds
    pub fn advance(&mut self, dt: f32) -> Result<()> {
        self.playback.advance(dt)
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.playback.phase()
    }

    pub fn is_animating(&self) -> bool {
        self.playback.is_animating()
    }

    pub fn playback_state(&self) -> &PlaybackState {
        self.playback.state()
    }

    /// Listen for changes of the "is animating" flag.
    ///
    /// Listeners run synchronously inside `sprint()`/`advance()`; they must
    /// not borrow this timeline again.
    pub fn on_animating_changed<F: FnMut(bool, bool) + 'static>(&mut self, listener: F) -> ListenerId {
        self.playback.state_mut().add_listener(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.playback.state_mut().remove_listener(id)
    }
}

impl fmt::Debug for Sprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sprint")
            .field("steps", &self.steps)
            .field("bound", &self.node.is_some())
            .field("easing", &self.easing)
            .field("phase", &self.playback.phase())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::{EasingFamily, EasingMode};
    use sprint_core::{Rect, SceneNode, Size};

    fn node(name: &str) -> SharedNode {
        SceneNode::new(name, Rect::new(0.0, 0.0, 50.0, 20.0), Size::new(400.0, 300.0)).shared()
    }

    #[test]
    fn test_chaining_appends_in_order() {
        let mut sprint = Sprint::new(node("a"));
        sprint
            .wait(0.5)
            .unwrap()
            .move_to(1.0, 10.0, 0.0)
            .unwrap()
            .fade_to(1.0, 0.0)
            .unwrap();

        let names: Vec<&str> = sprint.steps().iter().map(|s| s.kind().name()).collect();
        assert_eq!(names, vec!["wait", "move_to", "fade_to"]);
    }

    #[test]
    fn test_negative_duration_leaves_steps_unchanged() {
        let mut sprint = Sprint::new(node("a"));
        sprint.wait(1.0).unwrap();

        let err = sprint.rotate_to(-1.0, 90.0).unwrap_err();
        assert_eq!(err, AnimationError::InvalidDuration(-1.0));
        assert_eq!(sprint.len(), 1);

        assert!(matches!(
            sprint.wait(f32::INFINITY),
            Err(AnimationError::InvalidDuration(_))
        ));
        assert_eq!(sprint.len(), 1);
    }

    #[test]
    fn test_negative_loop_count() {
        let mut sprint = Sprint::new(node("a"));
        assert_eq!(
            sprint.repeat(-2).unwrap_err(),
            AnimationError::InvalidLoopCount(-2)
        );
        assert!(sprint.is_empty());
    }

    #[test]
    fn test_unbound_node() {
        let mut sprint = Sprint::unbound();
        assert_eq!(
            sprint.slide_from_left(1.0).unwrap_err(),
            AnimationError::UnboundNode {
                step: "slide_from_left"
            }
        );
        assert_eq!(
            sprint.wait(0.2).unwrap_err(),
            AnimationError::UnboundNode { step: "wait" }
        );
        assert!(sprint.is_empty());

        sprint.set_node(node("a")).wait(0.2).unwrap().slide_from_left(1.0).unwrap();
        assert_eq!(sprint.len(), 2);
    }

    #[test]
    fn test_repeat_starts_playback() {
        let mut sprint = Sprint::new(node("a"));
        sprint.scale_to(2.0, 1.3, 1.3).unwrap().rotate_to(2.0, 360.0).unwrap();
        assert!(!sprint.is_animating());

        sprint.repeat(0).unwrap();
        assert!(sprint.is_animating());
        assert!(matches!(sprint.phase(), PlaybackPhase::Running { .. }));
    }

    #[test]
    fn test_failed_repeat_does_not_play() {
        let mut sprint = Sprint::new(node("a"));
        sprint.fade_to(1.0, 0.0).unwrap();
        assert!(sprint.repeat(-1).is_err());
        assert!(!sprint.is_animating());
        assert_eq!(sprint.len(), 1);
    }

    #[test]
    fn test_steps_capture_context_when_appended() {
        let a = node("a");
        let b = node("b");

        let mut sprint = Sprint::new(a.clone());
        sprint.set_interpolator(EasingFamily::Bounce);
        sprint.fade_to(1.0, 0.5).unwrap();
        sprint
            .set_node(b.clone())
            .set_interpolator((EasingFamily::Sine, EasingMode::EaseIn));
        sprint.fade_to(1.0, 0.5).unwrap();

        let steps = sprint.steps();
        assert!(std::rc::Rc::ptr_eq(steps[0].node().unwrap(), &a));
        assert!(std::rc::Rc::ptr_eq(steps[1].node().unwrap(), &b));
        assert_eq!(
            steps[0].easing(),
            Easing::Curve(EasingFamily::Bounce, EasingMode::EaseOut)
        );
        assert_eq!(
            steps[1].easing(),
            Easing::Curve(EasingFamily::Sine, EasingMode::EaseIn)
        );
    }

    #[test]
    fn test_duration_counts_concurrent_steps_once() {
        let mut sprint = Sprint::new(node("a"));
        sprint
            .wait(0.5)
            .unwrap()
            .slide_from_left(2.0)
            .unwrap()
            .rotate_to(1.0, 360.0)
            .unwrap()
            .repeat(0)
            .unwrap();

        assert!((sprint.duration() - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_clear_keeps_context() {
        let mut sprint = Sprint::new(node("a"));
        sprint.set_interpolator(EasingFamily::Quintic);
        sprint.wait(1.0).unwrap();
        sprint.clear();

        assert!(sprint.is_empty());
        assert!(sprint.node().is_some());
        assert_eq!(sprint.interpolator(), Easing::from(EasingFamily::Quintic));
    }

    #[test]
    fn test_default_interpolator() {
        assert_eq!(Sprint::unbound().interpolator(), Easing::EASE_BOTH);
    }
}
