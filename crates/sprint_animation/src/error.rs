//! Animation error types

use crate::scheduler::TimelineId;
use sprint_core::NodeError;
use thiserror::Error;

/// Errors raised while building or playing a timeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// A step was given a negative or non-finite duration
    #[error("invalid duration {0}: durations must be finite and >= 0")]
    InvalidDuration(f32),

    /// A loop marker was given a negative count
    #[error("invalid loop count {0}: counts must be >= 0")]
    InvalidLoopCount(i32),

    /// A property step was appended before any node was bound
    #[error("cannot append {step}: no node is bound")]
    UnboundNode { step: &'static str },

    /// `advance` was called with a negative or non-finite delta
    #[error("invalid time step {0}: deltas must be finite and >= 0")]
    InvalidTimeStep(f32),

    /// The host still holds a borrow of a step's node during a tick
    #[error("node for {step} is borrowed elsewhere during a tick")]
    NodeBusy { step: &'static str },

    /// The node adapter rejected a property write
    #[error(transparent)]
    Node(#[from] NodeError),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;

/// Failures collected from one scheduler tick
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} timeline(s) failed during tick", .failures.len())]
pub struct TickError {
    pub failures: Vec<(TimelineId, AnimationError)>,
}
