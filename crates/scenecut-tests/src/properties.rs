//! Property tests for timeline invariants.
//!
//! Random edit sequences are replayed against the reducer and against a
//! plain `Vec` of durations; the two must agree after every step.

use std::sync::Arc;

use proptest::prelude::*;
use scenecut_core::editor_limits::MINIMUM_CLIP_LENGTH;
use scenecut_core::RationalTime;
use scenecut_timeline::{Asset, Clip, ClipAction, EditError, EditorConfig, EditorState};
use smallvec::smallvec;

// ── Helpers ────────────────────────────────────────────────────

fn tenths(n: i64) -> RationalTime {
    RationalTime::new(n, 10)
}

fn clip_of(duration: RationalTime) -> Clip {
    Clip::new(Arc::new(Asset::new("p", "Prop", "media/prop.mp4", duration)))
}

fn timeline(durations: &[i64]) -> EditorState {
    EditorState::with_clips(
        EditorConfig::default(),
        durations.iter().map(|n| clip_of(tenths(*n))),
    )
    .unwrap()
}

fn durations(state: &EditorState) -> Vec<RationalTime> {
    state.clips().values().map(|clip| clip.duration).collect()
}

/// Position `permille / 1000` of the way through `total`.
fn fraction_of(total: RationalTime, permille: i64) -> RationalTime {
    total * permille / 1000
}

/// Clip index and offset under `time` in a duration list.
fn locate(model: &[RationalTime], time: RationalTime) -> Option<(usize, RationalTime)> {
    let mut start = RationalTime::ZERO;
    for (index, duration) in model.iter().enumerate() {
        if time < start + *duration {
            return Some((index, time - start));
        }
        start += *duration;
    }
    None
}

#[derive(Debug, Clone)]
enum Op {
    Append(i64),
    Split(i64),
    Move(usize, usize),
    Duplicate(usize),
    Delete(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..=300).prop_map(Op::Append),
        (0i64..1000).prop_map(Op::Split),
        (0usize..32, 0usize..32).prop_map(|(from, to)| Op::Move(from, to)),
        (0usize..32).prop_map(Op::Duplicate),
        (0usize..32).prop_map(Op::Delete),
    ]
}

/// Apply `op` to both the reducer state and the model.
fn step(state: EditorState, model: &mut Vec<RationalTime>, op: &Op) -> EditorState {
    let len = model.len();
    match *op {
        Op::Append(n) => {
            model.push(tenths(n));
            state.reduce(ClipAction::AppendClip { clip: clip_of(tenths(n)) }).unwrap()
        }
        Op::Split(permille) => {
            let total: RationalTime = model.iter().copied().sum();
            let time = fraction_of(total, permille);
            let result = state.reduce(ClipAction::SplitClip { time });
            match locate(model, time) {
                None => {
                    assert!(matches!(result, Err(EditError::NothingAtTime { .. })));
                    state
                }
                Some((index, offset)) => {
                    let remainder = model[index] - offset;
                    if offset < MINIMUM_CLIP_LENGTH || remainder < MINIMUM_CLIP_LENGTH {
                        assert!(matches!(result, Err(EditError::DegenerateSplit { .. })));
                        state
                    } else {
                        model[index] = remainder;
                        model.insert(index, offset);
                        result.unwrap()
                    }
                }
            }
        }
        Op::Move(from, to) if len > 0 => {
            let (from, to) = (from % len, to % len);
            let moved = model.remove(from);
            model.insert(to, moved);
            state.reduce(ClipAction::MoveClip { old_index: from, new_index: to }).unwrap()
        }
        Op::Duplicate(index) if len > 0 => {
            let id = state.clips().node_at(index % len).unwrap();
            model.push(model[index % len]);
            state.reduce(ClipAction::DuplicateClips { ids: Some(smallvec![id]) }).unwrap()
        }
        Op::Delete(index) if len > 0 => {
            let id = state.clips().node_at(index % len).unwrap();
            model.remove(index % len);
            state.reduce(ClipAction::DeleteClips { ids: Some(smallvec![id]) }).unwrap()
        }
        _ => state,
    }
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn duration_is_conserved_across_edits(ops in prop::collection::vec(op(), 1..40)) {
        let mut state = EditorState::default();
        let mut model = Vec::new();
        for op in &ops {
            state = step(state, &mut model, op);
            prop_assert!(state.is_consistent());
            prop_assert_eq!(durations(&state), model.clone());
            prop_assert_eq!(state.total_duration(), model.iter().copied().sum::<RationalTime>());
        }
    }

    #[test]
    fn seek_lands_inside_covering_clip(
        lengths in prop::collection::vec(1i64..=100, 1..20),
        permille in 0i64..1000,
    ) {
        let state = timeline(&lengths);
        let time = fraction_of(state.total_duration(), permille);
        let hit = state.seek(time).unwrap();

        prop_assert!(hit.offset >= RationalTime::ZERO);
        prop_assert!(hit.offset < hit.clip.duration);
        prop_assert_eq!(state.clip_start(hit.node).unwrap() + hit.offset, time);
    }

    #[test]
    fn seek_outside_timeline_finds_nothing(
        lengths in prop::collection::vec(1i64..=100, 0..20),
        past in 0i64..100,
    ) {
        let state = timeline(&lengths);
        prop_assert!(state.seek(state.total_duration() + tenths(past)).is_none());
        prop_assert!(state.seek(-tenths(past + 1)).is_none());
    }

    #[test]
    fn split_preserves_asset_window(
        start in 0i64..100,
        length in 2i64..500,
        cut in 1i64..499,
    ) {
        prop_assume!(cut < length);
        let asset = Arc::new(Asset::new("w", "Window", "media/w.mp4", tenths(start + length)));
        let original = Clip::with_window(asset, tenths(start), tenths(length)).unwrap();
        let state = EditorState::with_clips(EditorConfig::default(), [original.clone()]).unwrap();

        let state = state.reduce(ClipAction::SplitClip { time: tenths(cut) }).unwrap();
        let halves: Vec<&Clip> = state.clips().values().collect();

        prop_assert_eq!(halves.len(), 2);
        prop_assert_eq!(halves[0].start_time, original.start_time);
        prop_assert_eq!(halves[0].duration, tenths(cut));
        prop_assert_eq!(halves[0].end_time(), halves[1].start_time);
        prop_assert_eq!(halves[1].end_time(), original.end_time());
        prop_assert_eq!(halves[0].merged_with(halves[1]), Some(original));
    }

    #[test]
    fn undo_and_redo_are_inverses(
        lengths in prop::collection::vec(1i64..=100, 1..10),
        op in op(),
    ) {
        let before = timeline(&lengths);
        let mut model = durations(&before);
        let after = step(before.clone(), &mut model, &op);
        prop_assume!(after.can_undo());

        let undone = after.reduce(ClipAction::Undo).unwrap();
        prop_assert_eq!(undone.present(), before.present());

        let redone = undone.reduce(ClipAction::Redo).unwrap();
        prop_assert_eq!(redone.present(), after.present());
    }

    #[test]
    fn history_stays_bounded(capacity in 1usize..20, edits in 0usize..60) {
        let config = EditorConfig { undo_states: capacity, ..EditorConfig::default() };
        let mut state = EditorState::new(config);
        for _ in 0..edits {
            state = state.reduce(ClipAction::AppendClip { clip: clip_of(tenths(5)) }).unwrap();
            prop_assert!(state.undo_depth() <= capacity);
        }
        prop_assert_eq!(state.undo_depth(), edits.min(capacity));
    }
}
