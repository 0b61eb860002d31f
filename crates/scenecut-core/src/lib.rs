//! Scenecut Core - Foundation types for the clip timeline engine
//!
//! This crate provides the fundamental types shared by the editor crates:
//! - Time representation (RationalTime, FrameRate, TimeRange)
//! - The common error type
//! - Editing limits shared by the reducer and its collaborators

pub mod error;
pub mod time;

pub use error::{Result, ScenecutError};
pub use time::{FrameRate, RationalTime, TimeRange};

/// Default editing limits for a clip timeline session.
pub mod editor_limits {
    use crate::time::RationalTime;

    /// Shortest clip the editor will produce or accept (0.1 s).
    pub const MINIMUM_CLIP_LENGTH: RationalTime = RationalTime::new_reduced(1, 10);

    /// Number of snapshots kept in the undo history.
    pub const CLIP_UNDO_STATES: usize = 50;
}
