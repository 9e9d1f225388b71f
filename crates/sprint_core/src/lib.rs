//! Sprint Core
//!
//! This crate provides the foundational primitives for the Sprint animator:
//!
//! - **Node Adapters**: the property surface a host exposes for animation
//! - **Observable Values**: change notification without a binding framework
//! - **Geometry**: the small set of 2D types shared by both
//!
//! # Example
//!
//! ```rust
//! use sprint_core::observable::Observable;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let mut animating = Observable::new(false);
//!
//! let flips = Rc::new(Cell::new(0));
//! let flips_in_listener = flips.clone();
//! animating.add_listener(move |_old, _new| {
//!     flips_in_listener.set(flips_in_listener.get() + 1);
//! });
//!
//! animating.set(true);
//! animating.set(true);
//! assert_eq!(flips.get(), 1);
//! ```

pub mod geometry;
pub mod node;
pub mod observable;

pub use geometry::{Rect, Size, Vec2};
pub use node::{AnimatedNode, NodeError, NodeKey, SceneNode, SharedNode};
pub use observable::{ListenerId, Observable};
