//! Node property adapters
//!
//! The animation engine never talks to a concrete scene graph. Hosts expose
//! their visual nodes through [`AnimatedNode`], which covers the four
//! animatable properties plus the layout information needed to compute
//! slide-in offsets.
//!
//! [`SceneNode`] is a plain in-memory implementation used by headless hosts
//! and tests.

use crate::geometry::{Rect, Size, Vec2};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Errors reported by a node adapter when a property write fails
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    /// The node refused a property write
    #[error("node '{node}' rejected write to {property}: {reason}")]
    Rejected {
        node: String,
        property: &'static str,
        reason: String,
    },

    /// The node is no longer attached to a scene
    #[error("node '{node}' is detached from its scene")]
    Detached { node: String },
}

/// Result type for node adapter operations
pub type Result<T> = std::result::Result<T, NodeError>;

/// Animatable properties of a visual node
///
/// Translation is an offset from the node's layout position, rotation is in
/// degrees and opacity is in `0.0..=1.0`.
pub trait AnimatedNode {
    /// Human readable name used in logs and errors
    fn label(&self) -> &str {
        "node"
    }

    fn translate(&self) -> Vec2;
    fn set_translate(&mut self, value: Vec2) -> Result<()>;

    fn scale(&self) -> Vec2;
    fn set_scale(&mut self, value: Vec2) -> Result<()>;

    fn rotate(&self) -> f32;
    fn set_rotate(&mut self, degrees: f32) -> Result<()>;

    fn opacity(&self) -> f32;
    fn set_opacity(&mut self, value: f32) -> Result<()>;

    /// Untransformed layout rectangle in viewport coordinates
    fn layout_bounds(&self) -> Rect;

    /// Size of the viewport containing the node
    fn viewport(&self) -> Size;
}

/// A node shared between the host and any number of timelines
pub type SharedNode = Rc<RefCell<dyn AnimatedNode>>;

/// Identity of a shared node, stable for as long as the node is alive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey(usize);

impl NodeKey {
    pub fn of(node: &SharedNode) -> Self {
        NodeKey(Rc::as_ptr(node) as *const () as usize)
    }
}

/// In-memory node with directly stored properties
#[derive(Clone, Debug)]
pub struct SceneNode {
    name: String,
    bounds: Rect,
    viewport: Size,
    translate: Vec2,
    scale: Vec2,
    rotate: f32,
    opacity: f32,
    locked: bool,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, bounds: Rect, viewport: Size) -> Self {
        Self {
            name: name.into(),
            bounds,
            viewport,
            translate: Vec2::ZERO,
            scale: Vec2::ONE,
            rotate: 0.0,
            opacity: 1.0,
            locked: false,
        }
    }

    /// Builder: start at a given translation
    pub fn with_translate(mut self, x: f32, y: f32) -> Self {
        self.translate = Vec2::new(x, y);
        self
    }

    /// Builder: start at a given rotation
    pub fn with_rotate(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }

    /// Builder: start at a given opacity
    pub fn with_opacity(mut self, value: f32) -> Self {
        self.opacity = value;
        self
    }

    /// Reject every subsequent property write
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Wrap the node for sharing with timelines.
    ///
    /// The concrete handle is returned so the host can keep reading typed
    /// state; it coerces to [`SharedNode`] on clone.
    pub fn shared(self) -> Rc<RefCell<SceneNode>> {
        Rc::new(RefCell::new(self))
    }

    fn check_writable(&self, property: &'static str) -> Result<()> {
        if self.locked {
            return Err(NodeError::Rejected {
                node: self.name.clone(),
                property,
                reason: "node is locked".to_string(),
            });
        }
        Ok(())
    }
}

impl AnimatedNode for SceneNode {
    fn label(&self) -> &str {
        &self.name
    }

    fn translate(&self) -> Vec2 {
        self.translate
    }

    fn set_translate(&mut self, value: Vec2) -> Result<()> {
        self.check_writable("translate")?;
        self.translate = value;
        Ok(())
    }

    fn scale(&self) -> Vec2 {
        self.scale
    }

    fn set_scale(&mut self, value: Vec2) -> Result<()> {
        self.check_writable("scale")?;
        self.scale = value;
        Ok(())
    }

    fn rotate(&self) -> f32 {
        self.rotate
    }

    fn set_rotate(&mut self, degrees: f32) -> Result<()> {
        self.check_writable("rotate")?;
        self.rotate = degrees;
        Ok(())
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, value: f32) -> Result<()> {
        self.check_writable("opacity")?;
        self.opacity = value;
        Ok(())
    }

    fn layout_bounds(&self) -> Rect {
        self.bounds
    }

    fn viewport(&self) -> Size {
        self.viewport
    }
}
