//! One editing session.
//!
//! Holds the current [`EditorState`] and is the only place it is replaced.
//! Dispatches run one at a time to completion; a rejected action leaves the
//! state as it was.

use std::collections::HashSet;

use scenecut_core::{RationalTime, Result};
use tracing::{debug, info, warn};

use crate::action::ClipAction;
use crate::clip::Clip;
use crate::config::EditorConfig;
use crate::error::EditResult;
use crate::export::{ExportRequest, ExportSettings};
use crate::list::NodeId;
use crate::selection::batch_targets;
use crate::state::EditorState;

/// Editing session over a clip timeline.
#[derive(Debug, Default)]
pub struct EditorSession {
    state: EditorState,
}

impl EditorSession {
    /// Start with an empty timeline.
    pub fn new(config: EditorConfig) -> Self {
        info!(
            minimum_clip_length = %config.minimum_clip_length,
            undo_states = config.undo_states,
            "editor session started"
        );
        Self {
            state: EditorState::new(config),
        }
    }

    /// Start from an externally supplied clip list.
    pub fn with_clips(config: EditorConfig, clips: impl IntoIterator<Item = Clip>) -> EditResult<Self> {
        let state = EditorState::with_clips(config, clips)?;
        info!(clips = state.clips().len(), "editor session started");
        Ok(Self { state })
    }

    /// Current state.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: ClipAction) -> EditResult<&EditorState> {
        let name = action.name();
        let expected = if cfg!(debug_assertions) {
            expected_total(&self.state, &action)
        } else {
            None
        };
        match self.state.reduce(action) {
            Ok(next) => {
                debug_assert!(next.is_consistent(), "{name} broke timeline invariants");
                if let Some(expected) = expected {
                    debug_assert_eq!(
                        next.total_duration(),
                        expected,
                        "{name} changed the timeline duration unexpectedly"
                    );
                }
                self.state = next;
                debug!(
                    action = name,
                    clips = self.state.clips().len(),
                    duration = %self.state.total_duration(),
                    undo = self.state.undo_depth(),
                    redo = self.state.redo_depth(),
                    "applied"
                );
                Ok(&self.state)
            }
            Err(err) => {
                warn!(action = name, error = %err, "edit rejected");
                Err(err)
            }
        }
    }

    /// Apply actions in order, stopping at the first rejection.
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = ClipAction>) -> EditResult<&EditorState> {
        for action in actions {
            self.dispatch(action)?;
        }
        Ok(&self.state)
    }

    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.can_redo()
    }

    /// Build the export request for the current timeline.
    pub fn export(&self, settings: ExportSettings) -> Result<ExportRequest> {
        let request = ExportRequest::new(self.state.present(), settings)?;
        info!(
            title = %request.settings.name,
            clips = request.edits.len(),
            duration = %request.duration(),
            "export requested"
        );
        Ok(request)
    }
}

/// Total duration `action` should leave behind if it succeeds. `None` when
/// history decides the result or the action will be rejected anyway.
fn expected_total(state: &EditorState, action: &ClipAction) -> Option<RationalTime> {
    let present = state.present();
    let clips = present.clips();
    let total = present.total_duration();
    let batch = |ids: Option<&[NodeId]>| -> RationalTime {
        let targets: HashSet<NodeId> = batch_targets(ids, present.selection(), clips).into_iter().collect();
        targets.iter().filter_map(|id| clips.get(*id)).map(|clip| clip.duration).sum()
    };
    Some(match action {
        ClipAction::AppendClip { clip } | ClipAction::InsertClip { clip, .. } => total + clip.duration,
        ClipAction::RemoveClip { index } => total - clips.get(clips.node_at(*index)?)?.duration,
        ClipAction::MoveClip { .. }
        | ClipAction::SplitClip { .. }
        | ClipAction::SelectClip { .. }
        | ClipAction::ClearSelection => total,
        ClipAction::DeleteClips { ids } => total - batch(ids.as_deref()),
        ClipAction::DuplicateClips { ids } => total + batch(ids.as_deref()),
        ClipAction::TrimClip { id, duration, .. } => total - clips.get(*id)?.duration + *duration,
        ClipAction::Undo | ClipAction::Redo => return None,
    })
}
