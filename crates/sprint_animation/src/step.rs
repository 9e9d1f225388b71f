//! Animation steps
//!
//! A [`Step`] is one immutable timed operation. It captures the node and
//! easing that were active on the builder when it was appended, so later
//! `set_node`/`set_interpolator` calls never change what an existing step
//! does.

use crate::easing::Easing;
use sprint_core::node::{AnimatedNode, NodeKey, SharedNode};
use sprint_core::Vec2;
use std::fmt;

/// Viewport edge a slide enters from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// Translation offset that places the node just outside this edge
    pub fn offscreen_offset(self, node: &dyn AnimatedNode) -> Vec2 {
        let bounds = node.layout_bounds();
        let viewport = node.viewport();
        match self {
            Edge::Left => Vec2::new(-bounds.max_x(), 0.0),
            Edge::Right => Vec2::new(viewport.width - bounds.x, 0.0),
            Edge::Top => Vec2::new(0.0, -bounds.max_y()),
            Edge::Bottom => Vec2::new(0.0, viewport.height - bounds.y),
        }
    }
}

/// Number of extra passes a loop marker grants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopCount {
    Infinite,
    Times(u32),
}

impl LoopCount {
    /// Interpret the builder convention where 0 means forever
    pub fn from_count(count: u32) -> Self {
        if count == 0 {
            LoopCount::Infinite
        } else {
            LoopCount::Times(count)
        }
    }
}

/// The node property a step writes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Translate,
    Scale,
    Rotate,
    Opacity,
}

/// What a step does
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepKind {
    Wait,
    /// Animate translation by a relative offset
    MoveTo { dx: f32, dy: f32 },
    /// Start displaced by an offset and return to the current translation
    MoveFrom { dx: f32, dy: f32 },
    /// Start just outside a viewport edge and return to the current translation
    SlideFrom(Edge),
    ScaleTo { sx: f32, sy: f32 },
    /// Start at the given scale and return to the current scale
    ScaleFrom { sx: f32, sy: f32 },
    RotateTo { degrees: f32 },
    FadeTo { opacity: f32 },
    /// Repeat everything before this marker
    Loop(LoopCount),
}

impl StepKind {
    /// The property written, or `None` for markers and waits
    pub fn channel(&self) -> Option<Channel> {
        match self {
            StepKind::Wait | StepKind::Loop(_) => None,
            StepKind::MoveTo { .. } | StepKind::MoveFrom { .. } | StepKind::SlideFrom(_) => {
                Some(Channel::Translate)
            }
            StepKind::ScaleTo { .. } | StepKind::ScaleFrom { .. } => Some(Channel::Scale),
            StepKind::RotateTo { .. } => Some(Channel::Rotate),
            StepKind::FadeTo { .. } => Some(Channel::Opacity),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StepKind::Wait => "wait",
            StepKind::MoveTo { .. } => "move_to",
            StepKind::MoveFrom { .. } => "move_from",
            StepKind::SlideFrom(Edge::Left) => "slide_from_left",
            StepKind::SlideFrom(Edge::Right) => "slide_from_right",
            StepKind::SlideFrom(Edge::Top) => "slide_from_top",
            StepKind::SlideFrom(Edge::Bottom) => "slide_from_bottom",
            StepKind::ScaleTo { .. } => "scale_to",
            StepKind::ScaleFrom { .. } => "scale_from",
            StepKind::RotateTo { .. } => "rotate_to",
            StepKind::FadeTo { .. } => "fade_to",
            StepKind::Loop(_) => "loop",
        }
    }
}

/// One timed operation in a timeline
#[derive(Clone)]
pub struct Step {
    kind: StepKind,
    /// Duration in seconds
    duration: f32,
    easing: Easing,
    node: Option<SharedNode>,
}

impl Step {
    pub(crate) fn new(
        kind: StepKind,
        duration: f32,
        easing: Easing,
        node: Option<SharedNode>,
    ) -> Self {
        Self {
            kind,
            duration,
            easing,
            node,
        }
    }

    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn node(&self) -> Option<&SharedNode> {
        self.node.as_ref()
    }

    /// Node and property this step writes, used to detect overlapping writers
    pub(crate) fn target(&self) -> Option<(NodeKey, Channel)> {
        let channel = self.kind.channel()?;
        let node = self.node.as_ref()?;
        Some((NodeKey::of(node), channel))
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self
            .node
            .as_ref()
            .and_then(|n| n.try_borrow().ok().map(|n| n.label().to_string()));
        f.debug_struct("Step")
            .field("kind", &self.kind)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("node", &node)
            .finish()
    }
}
