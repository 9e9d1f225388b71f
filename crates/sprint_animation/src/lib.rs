//! Sprint Animation System
//!
//! Fluent, eased timelines for visual node properties.
//!
//! # Features
//!
//! - **Easing**: nine curve families in ease-in, ease-out and ease-in-out modes
//! - **Timelines**: chain moves, slides, scales, rotations, fades and waits
//! - **Looping**: repeat a timeline a fixed number of times or forever
//! - **Restartable**: calling `sprint()` again always replays from the start
//! - **Observable**: listen for the "is animating" flag flipping

pub mod easing;
pub mod error;
pub mod playback;
pub mod presets;
pub mod scheduler;
pub mod step;
pub mod timeline;

pub use easing::{Easing, EasingFamily, EasingMode};
pub use error::{AnimationError, Result, TickError};
pub use playback::{PlaybackPhase, PlaybackState};
pub use presets::AnimationPreset;
pub use scheduler::{AnimationScheduler, SharedSprint, TimelineId};
pub use step::{Edge, LoopCount, Step, StepKind};
pub use timeline::Sprint;
