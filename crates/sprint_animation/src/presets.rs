//! Animation presets for common entry and emphasis effects
//!
//! Each preset appends steps to a [`Sprint`] using its current node and
//! easing, so presets chain like any other step method.

use crate::error::Result;
use crate::step::Edge;
use crate::timeline::Sprint;

/// Pre-built step sequences for common patterns
pub struct AnimationPreset;

impl AnimationPreset {
    // ========================================================================
    // Fade animations
    // ========================================================================

    /// Jump to transparent, then fade in
    pub fn fade_in(sprint: &mut Sprint, duration: f32) -> Result<&mut Sprint> {
        sprint.fade_to(0.0, 0.0)?.fade_to(duration, 1.0)
    }

    pub fn fade_out(sprint: &mut Sprint, duration: f32) -> Result<&mut Sprint> {
        sprint.fade_to(duration, 0.0)
    }

    // ========================================================================
    // Scale animations
    // ========================================================================

    /// Grow to `scale` and back to 1
    pub fn pop(sprint: &mut Sprint, duration: f32, scale: f32) -> Result<&mut Sprint> {
        let half = duration / 2.0;
        sprint.scale_to(half, scale, scale)?.scale_to(half, 1.0, 1.0)
    }

    /// Quick scale-and-dim pulse that settles back to full size and opacity
    pub fn pulse(sprint: &mut Sprint) -> Result<&mut Sprint> {
        sprint
            .scale_to(0.18, 1.12, 1.12)?
            .fade_to(0.18, 0.85)?
            .wait(0.05)?
            .fade_to(0.18, 1.0)?
            .scale_to(0.18, 1.0, 1.0)
    }

    // ========================================================================
    // Motion
    // ========================================================================

    /// Slide in from `edge`, then settle with two horizontal nudges: `nudge`
    /// pixels, then 8/14 of it back the other way. The nudge axis does not
    /// depend on the edge.
    pub fn slide_in_settle(
        sprint: &mut Sprint,
        edge: Edge,
        duration: f32,
        nudge: f32,
    ) -> Result<&mut Sprint> {
        let sprint = match edge {
            Edge::Left => sprint.slide_from_left(duration)?,
            Edge::Right => sprint.slide_from_right(duration)?,
            Edge::Top => sprint.slide_from_top(duration)?,
            Edge::Bottom => sprint.slide_from_bottom(duration)?,
        };
        sprint
            .move_from(0.20, nudge, 0.0)?
            .move_from(0.14, -nudge * 8.0 / 14.0, 0.0)
    }

    /// One full turn on top of the given starting angle
    pub fn spin(sprint: &mut Sprint, duration: f32, from_degrees: f32) -> Result<&mut Sprint> {
        sprint.rotate_to(duration, from_degrees + 360.0)
    }
}
