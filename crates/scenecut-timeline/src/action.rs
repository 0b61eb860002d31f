//! Edit actions accepted by the reducer.

use scenecut_core::time::seconds;
use scenecut_core::RationalTime;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::clip::Clip;
use crate::list::NodeId;

/// A batch of clip identities.
pub type NodeIds = SmallVec<[NodeId; 4]>;

/// One discrete edit intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClipAction {
    /// Add a clip at the end of the timeline.
    AppendClip { clip: Clip },
    /// Remove the clip at a position.
    RemoveClip { index: usize },
    /// Insert a clip so it lands at `index`.
    InsertClip { index: usize, clip: Clip },
    /// Drag a clip from one position to another.
    MoveClip { old_index: usize, new_index: usize },
    /// Cut the clip under a timeline position in two.
    SplitClip {
        #[serde(with = "seconds")]
        time: RationalTime,
    },
    /// Remove the given clips, or the selection when `ids` is `None`.
    DeleteClips {
        #[serde(default)]
        ids: Option<NodeIds>,
    },
    /// Append copies of the given clips, or of the selection.
    DuplicateClips {
        #[serde(default)]
        ids: Option<NodeIds>,
    },
    /// Toggle selection of one clip.
    SelectClip { id: NodeId },
    /// Deselect everything.
    ClearSelection,
    /// Give one clip a new asset window.
    TrimClip {
        id: NodeId,
        #[serde(with = "seconds")]
        start_time: RationalTime,
        #[serde(with = "seconds")]
        duration: RationalTime,
    },
    Undo,
    Redo,
}

impl ClipAction {
    /// Whether a successful dispatch records an undo step.
    pub fn is_recorded(&self) -> bool {
        !matches!(
            self,
            Self::SelectClip { .. } | Self::ClearSelection | Self::Undo | Self::Redo
        )
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AppendClip { .. } => "append_clip",
            Self::RemoveClip { .. } => "remove_clip",
            Self::InsertClip { .. } => "insert_clip",
            Self::MoveClip { .. } => "move_clip",
            Self::SplitClip { .. } => "split_clip",
            Self::DeleteClips { .. } => "delete_clips",
            Self::DuplicateClips { .. } => "duplicate_clips",
            Self::SelectClip { .. } => "select_clip",
            Self::ClearSelection => "clear_selection",
            Self::TrimClip { .. } => "trim_clip",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }

    /// Delete the current selection.
    pub fn delete_selected() -> Self {
        Self::DeleteClips { ids: None }
    }

    /// Duplicate the current selection.
    pub fn duplicate_selected() -> Self {
        Self::DuplicateClips { ids: None }
    }
}
