//! Errors raised by timeline edits.
//!
//! Every variant is local and recoverable: a rejected action leaves the
//! editor state exactly as it was.

use std::fmt;

use scenecut_core::{RationalTime, ScenecutError};
use thiserror::Error;

use crate::list::NodeId;

/// Which history stack an undo/redo request targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
        }
    }
}

/// A rejected timeline edit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("index {index} is out of range for a timeline of {len} clips")]
    InvalidIndex { index: usize, len: usize },

    #[error("split at {offset} leaves {remainder}; clips must be at least {minimum}")]
    DegenerateSplit {
        offset: RationalTime,
        remainder: RationalTime,
        minimum: RationalTime,
    },

    #[error("no clip covers timeline position {time}")]
    NothingAtTime { time: RationalTime },

    #[error("nothing to {0}")]
    EmptyHistory(HistoryDirection),

    #[error("no clip with id {0}")]
    UnknownIdentity(NodeId),

    #[error("invalid clip: {0}")]
    InvalidClip(String),
}

/// Result type alias for timeline edits.
pub type EditResult<T> = std::result::Result<T, EditError>;

impl From<EditError> for ScenecutError {
    fn from(err: EditError) -> Self {
        ScenecutError::Timeline(err.to_string())
    }
}
