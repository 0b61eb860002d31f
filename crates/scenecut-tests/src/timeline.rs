//! Integration tests for the clip timeline.
//!
//! Exercises cross-crate interactions between scenecut-core time
//! arithmetic and the scenecut-timeline reducer, session and export.

use std::sync::Arc;

use scenecut_core::editor_limits::{CLIP_UNDO_STATES, MINIMUM_CLIP_LENGTH};
use scenecut_core::RationalTime;
use scenecut_timeline::{
    Asset, Clip, ClipAction, EditError, EditorConfig, EditorSession, EditorState, ExportSettings,
    HistoryDirection,
};
use smallvec::smallvec;

// ── Helpers ────────────────────────────────────────────────────

fn asset(id: &str, secs: i64) -> Arc<Asset> {
    Arc::new(Asset::new(id, id, format!("media/{id}.mp4"), RationalTime::from_secs(secs)))
}

fn clip(id: &str, secs: i64) -> Clip {
    Clip::new(asset(id, secs))
}

fn timeline(clips: &[(&str, i64)]) -> EditorState {
    EditorState::with_clips(
        EditorConfig::default(),
        clips.iter().map(|(id, secs)| clip(id, *secs)),
    )
    .unwrap()
}

fn asset_ids(state: &EditorState) -> Vec<String> {
    state.clips().values().map(|c| c.asset.id.clone()).collect()
}

fn apply(state: &EditorState, action: ClipAction) -> EditorState {
    state.reduce(action).unwrap()
}

// ── Seek ───────────────────────────────────────────────────────

#[test]
fn seek_resolves_clip_and_offset() {
    let state = timeline(&[("a", 5), ("b", 5)]);
    let hit = state.seek(RationalTime::from_secs(7)).unwrap();
    assert_eq!(hit.clip.asset.id, "b");
    assert_eq!(hit.offset, RationalTime::from_secs(2));
}

#[test]
fn seek_boundary_belongs_to_next_clip() {
    let state = timeline(&[("a", 5), ("b", 5)]);
    let hit = state.seek(RationalTime::from_secs(5)).unwrap();
    assert_eq!(hit.clip.asset.id, "b");
    assert_eq!(hit.offset, RationalTime::ZERO);

    assert!(state.seek(RationalTime::from_secs(10)).is_none());
    assert!(state.seek(RationalTime::new(-1, 10)).is_none());
}

#[test]
fn playback_report_round_trips_through_seek() {
    let state = timeline(&[("a", 4), ("b", 6), ("c", 3)]);
    let position = RationalTime::new(23, 2); // 11.5s
    let hit = state.seek(position).unwrap();
    assert_eq!(state.timeline_time(hit.node, hit.offset), Some(position));
}

// ── Split ──────────────────────────────────────────────────────

#[test]
fn split_single_clip() {
    let state = timeline(&[("a", 10)]);
    let state = apply(&state, ClipAction::SplitClip { time: RationalTime::from_secs(4) });

    let clips: Vec<&Clip> = state.clips().values().collect();
    assert_eq!(clips.len(), 2);
    assert_eq!(clips[0].duration, RationalTime::from_secs(4));
    assert_eq!(clips[1].duration, RationalTime::from_secs(6));
    assert_eq!(clips[1].start_time, clips[0].start_time + RationalTime::from_secs(4));
    assert!(Arc::ptr_eq(&clips[0].asset, &clips[1].asset));
}

#[test]
fn split_rejects_sliver_remainder() {
    let state = timeline(&[("a", 10)]);
    let time = RationalTime::from_secs(10) - RationalTime::new(1, 20); // 9.95s
    let err = state.reduce(ClipAction::SplitClip { time }).unwrap_err();

    match err {
        EditError::DegenerateSplit { remainder, minimum, .. } => {
            assert_eq!(remainder, RationalTime::new(1, 20));
            assert_eq!(minimum, MINIMUM_CLIP_LENGTH);
        }
        other => panic!("expected DegenerateSplit, got {other:?}"),
    }
    assert_eq!(state.clips().len(), 1);
}

#[test]
fn split_then_trim_each_half() {
    let state = timeline(&[("a", 10)]);
    let state = apply(&state, ClipAction::SplitClip { time: RationalTime::from_secs(4) });
    let second = state.clips().node_at(1).unwrap();

    let state = apply(
        &state,
        ClipAction::TrimClip {
            id: second,
            start_time: RationalTime::from_secs(5),
            duration: RationalTime::from_secs(2),
        },
    );
    assert_eq!(state.total_duration(), RationalTime::from_secs(6));
    assert_eq!(state.clip_start(second), Some(RationalTime::from_secs(4)));
}

// ── Selection, delete and duplicate ───────────────────────────

#[test]
fn delete_selection_and_undo_restores_it() {
    let state = timeline(&[("a", 3), ("b", 3), ("c", 3)]);
    let b = state.clips().node_at(1).unwrap();

    let state = apply(&state, ClipAction::SelectClip { id: b });
    let state = apply(&state, ClipAction::delete_selected());
    assert_eq!(asset_ids(&state), ["a", "c"]);
    assert!(!state.is_selected(b));

    let state = apply(&state, ClipAction::Undo);
    assert_eq!(asset_ids(&state), ["a", "b", "c"]);
    assert!(state.is_selected(b));
}

#[test]
fn duplicate_appends_copies_in_timeline_order() {
    let state = timeline(&[("a", 2), ("b", 3), ("c", 4)]);
    let a = state.clips().node_at(0).unwrap();
    let c = state.clips().node_at(2).unwrap();

    let state = apply(&state, ClipAction::SelectClip { id: c });
    let state = apply(&state, ClipAction::SelectClip { id: a });
    let state = apply(&state, ClipAction::duplicate_selected());

    assert_eq!(asset_ids(&state), ["a", "b", "c", "a", "c"]);
    assert_eq!(state.total_duration(), RationalTime::from_secs(15));
    assert_eq!(state.present().selection().len(), 2);
}

#[test]
fn explicit_batch_skips_unknown_ids() {
    let other = timeline(&[("x", 1)]);
    let stranger = other.clips().head().unwrap();

    let state = timeline(&[("a", 2), ("b", 3)]);
    let a = state.clips().head().unwrap();
    let state = apply(&state, ClipAction::DeleteClips { ids: Some(smallvec![stranger, a]) });
    assert_eq!(asset_ids(&state), ["b"]);

    let unchanged = apply(&state, ClipAction::DeleteClips { ids: Some(smallvec![stranger]) });
    assert_eq!(unchanged, state);
}

// ── History ────────────────────────────────────────────────────

#[test]
fn undo_redo_through_mixed_edits() {
    let start = timeline(&[("a", 4), ("b", 6)]);
    let split = apply(&start, ClipAction::SplitClip { time: RationalTime::from_secs(7) });
    let moved = apply(&split, ClipAction::MoveClip { old_index: 2, new_index: 0 });

    let back = apply(&moved, ClipAction::Undo);
    assert_eq!(back.present(), split.present());
    let back = apply(&back, ClipAction::Undo);
    assert_eq!(back.present(), start.present());

    let forward = apply(&back, ClipAction::Redo);
    assert_eq!(forward.present(), split.present());
    let forward = apply(&forward, ClipAction::Redo);
    assert_eq!(forward.present(), moved.present());

    assert_eq!(
        forward.reduce(ClipAction::Redo).unwrap_err(),
        EditError::EmptyHistory(HistoryDirection::Redo)
    );
}

#[test]
fn history_never_exceeds_limit() {
    let mut state = EditorState::default();
    for i in 0..CLIP_UNDO_STATES + 20 {
        state = apply(&state, ClipAction::AppendClip { clip: clip(&format!("c{i}"), 1) });
        assert!(state.undo_depth() <= CLIP_UNDO_STATES);
    }
    assert_eq!(state.undo_depth(), CLIP_UNDO_STATES);

    while state.can_undo() {
        state = apply(&state, ClipAction::Undo);
    }
    // The oldest 20 steps were evicted.
    assert_eq!(state.clips().len(), 20);
}

#[test]
fn custom_config_bounds_history_and_minimum() {
    let config = EditorConfig::from_json(br#"{"minimum_clip_length": 1.0, "undo_states": 2}"#).unwrap();
    let mut state = EditorState::new(config);
    for i in 0..4 {
        state = apply(&state, ClipAction::AppendClip { clip: clip(&format!("c{i}"), 3) });
    }
    assert_eq!(state.undo_depth(), 2);

    let err = state
        .reduce(ClipAction::SplitClip { time: RationalTime::new(5, 2) })
        .unwrap_err();
    assert!(matches!(err, EditError::DegenerateSplit { .. }));
}

// ── Session and export ─────────────────────────────────────────

#[test]
fn session_edits_feed_export_request() {
    let mut session = EditorSession::new(EditorConfig::default());
    session
        .dispatch_all([
            ClipAction::AppendClip { clip: clip("intro", 10) },
            ClipAction::AppendClip { clip: clip("drill", 20) },
            ClipAction::SplitClip { time: RationalTime::from_secs(4) },
            ClipAction::RemoveClip { index: 0 },
        ])
        .unwrap();

    let request = session.export(ExportSettings::titled("Drill walkthrough")).unwrap();
    assert_eq!(request.duration(), RationalTime::from_secs(26));

    let json: serde_json::Value = serde_json::from_slice(&request.to_json().unwrap()).unwrap();
    assert_eq!(json["edits"][0]["asset_id"], "intro");
    assert_eq!(json["edits"][0]["start_time"], "4.000");
    assert_eq!(json["edits"][0]["duration"], "6.000");
    assert_eq!(json["edits"][1]["asset_id"], "drill");
    assert_eq!(json["settings"]["resolution"], "3840x1920");
}

#[test]
fn actions_deserialize_from_wire_format() {
    let json = br#"[
        {"type": "APPEND_CLIP", "clip": {
            "asset": {"id": "a1", "name": "Lobby", "path": "media/lobby.mp4", "duration": 12.5},
            "start_time": 0.0, "duration": 12.5}},
        {"type": "SPLIT_CLIP", "time": 2.5},
        {"type": "UNDO"}
    ]"#;
    let actions: Vec<ClipAction> = serde_json::from_slice(json).unwrap();

    let mut session = EditorSession::new(EditorConfig::default());
    session.dispatch_all(actions).unwrap();
    assert_eq!(session.state().clips().len(), 1);
    assert_eq!(session.state().total_duration(), RationalTime::new(25, 2));
    assert!(session.can_redo());
}
