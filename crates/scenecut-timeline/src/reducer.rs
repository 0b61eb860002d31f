//! The edit reducer: `(state, action) -> state`.
//!
//! Every transition clones the present snapshot, edits the clone, and wraps
//! it in a new `Arc`; the input state is never modified. Recorded actions
//! push the pre-edit snapshot onto the undo history. An action that turns
//! out to change nothing (a batch whose ids are all unknown, a move onto
//! itself) returns the state unchanged without a history entry.

use std::sync::Arc;

use scenecut_core::RationalTime;
use tracing::debug;

use crate::action::ClipAction;
use crate::clip::Clip;
use crate::error::{EditError, EditResult, HistoryDirection};
use crate::list::NodeId;
use crate::selection::batch_targets;
use crate::state::{ClipsState, EditorState};

/// Whether an edit touched the snapshot.
enum Outcome {
    Changed,
    Unchanged,
}

/// Apply one action to `state`.
pub fn reduce(state: &EditorState, action: ClipAction) -> EditResult<EditorState> {
    let minimum = state.config.minimum_clip_length;
    let record = action.is_recorded();

    match action {
        ClipAction::Undo => undo(state),
        ClipAction::Redo => redo(state),
        ClipAction::AppendClip { clip } => commit(state, record, |s| {
            clip.validate(minimum)?;
            s.clips.append(clip);
            Ok(Outcome::Changed)
        }),
        ClipAction::RemoveClip { index } => commit(state, record, |s| {
            let (id, _) = s.clips.remove_at(index)?;
            s.selection.remove(id);
            Ok(Outcome::Changed)
        }),
        ClipAction::InsertClip { index, clip } => commit(state, record, |s| {
            clip.validate(minimum)?;
            s.clips.insert_at(index, clip)?;
            Ok(Outcome::Changed)
        }),
        ClipAction::MoveClip {
            old_index,
            new_index,
        } => commit(state, record, |s| {
            s.clips.move_to(old_index, new_index)?;
            Ok(if old_index == new_index {
                Outcome::Unchanged
            } else {
                Outcome::Changed
            })
        }),
        ClipAction::SplitClip { time } => commit(state, record, |s| split(s, time, minimum)),
        ClipAction::DeleteClips { ids } => commit(state, record, |s| {
            let targets = batch_targets(ids.as_deref(), &s.selection, &s.clips);
            let removed = s.clips.delete_nodes(&targets, |clip| clip.duration);
            for id in &removed.nodes {
                s.selection.remove(*id);
            }
            debug!(count = removed.nodes.len(), freed = %removed.total, "deleted clips");
            Ok(changed_if(!removed.nodes.is_empty()))
        }),
        ClipAction::DuplicateClips { ids } => commit(state, record, |s| {
            let targets = batch_targets(ids.as_deref(), &s.selection, &s.clips);
            let added = s.clips.append_nodes(&targets, |clip| clip.duration);
            debug!(count = added.nodes.len(), added = %added.total, "duplicated clips");
            Ok(changed_if(!added.nodes.is_empty()))
        }),
        ClipAction::SelectClip { id } => commit(state, record, |s| {
            if !s.clips.contains(id) {
                return Err(EditError::UnknownIdentity(id));
            }
            s.selection.toggle(id);
            Ok(Outcome::Changed)
        }),
        ClipAction::ClearSelection => commit(state, record, |s| {
            let had_selection = !s.selection.is_empty();
            s.selection.clear();
            Ok(changed_if(had_selection))
        }),
        ClipAction::TrimClip {
            id,
            start_time,
            duration,
        } => commit(state, record, |s| trim(s, id, start_time, duration, minimum)),
    }
}

fn changed_if(changed: bool) -> Outcome {
    if changed {
        Outcome::Changed
    } else {
        Outcome::Unchanged
    }
}

/// Run `edit` against a copy of the present snapshot and assemble the
/// next state.
fn commit<F>(state: &EditorState, record: bool, edit: F) -> EditResult<EditorState>
where
    F: FnOnce(&mut ClipsState) -> EditResult<Outcome>,
{
    let mut next = ClipsState::clone(&state.present);
    match edit(&mut next)? {
        Outcome::Unchanged => Ok(state.clone()),
        Outcome::Changed => {
            let mut history = state.history.clone();
            if record {
                history.record(Arc::clone(&state.present));
            }
            Ok(EditorState {
                present: Arc::new(next),
                history,
                config: state.config.clone(),
            })
        }
    }
}

fn split(s: &mut ClipsState, time: RationalTime, minimum: RationalTime) -> EditResult<Outcome> {
    let (id, offset) = s
        .clips
        .find_by_accumulated_sum(time, |clip: &Clip| clip.duration)
        .ok_or(EditError::NothingAtTime { time })?;
    let duration = s
        .clips
        .get(id)
        .map(|clip| clip.duration)
        .ok_or(EditError::UnknownIdentity(id))?;

    let remainder = duration - offset;
    let degenerate = EditError::DegenerateSplit {
        offset,
        remainder,
        minimum,
    };
    if offset < minimum || remainder < minimum {
        return Err(degenerate);
    }

    s.clips
        .split(time, |clip: &Clip| clip.duration, |clip, offset| clip.split_at(offset))
        .ok_or(degenerate)?;
    Ok(Outcome::Changed)
}

fn trim(
    s: &mut ClipsState,
    id: NodeId,
    start_time: RationalTime,
    duration: RationalTime,
    minimum: RationalTime,
) -> EditResult<Outcome> {
    let clip = s.clips.get_mut(id).ok_or(EditError::UnknownIdentity(id))?;
    let trimmed = clip.trimmed(start_time, duration)?;
    trimmed.validate(minimum)?;
    *clip = trimmed;
    Ok(Outcome::Changed)
}

fn undo(state: &EditorState) -> EditResult<EditorState> {
    let mut history = state.history.clone();
    let previous = history
        .undo(&state.present)
        .ok_or(EditError::EmptyHistory(HistoryDirection::Undo))?;
    Ok(EditorState {
        present: previous,
        history,
        config: state.config.clone(),
    })
}

fn redo(state: &EditorState) -> EditResult<EditorState> {
    let mut history = state.history.clone();
    let next = history
        .redo(&state.present)
        .ok_or(EditError::EmptyHistory(HistoryDirection::Redo))?;
    Ok(EditorState {
        present: next,
        history,
        config: state.config.clone(),
    })
}
