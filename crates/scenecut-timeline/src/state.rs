//! Editor state: clip snapshots, history, and the query interface used by
//! rendering and playback.

use std::sync::Arc;

use scenecut_core::{RationalTime, TimeRange};

use crate::action::ClipAction;
use crate::clip::Clip;
use crate::config::EditorConfig;
use crate::error::EditResult;
use crate::history::History;
use crate::list::{NodeId, OrderedList};
use crate::reducer;
use crate::selection::Selection;

// ── Snapshot ────────────────────────────────────────────────────

/// The clip timeline at one point in history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipsState {
    pub(crate) clips: OrderedList<Clip>,
    pub(crate) selection: Selection,
}

impl ClipsState {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered clips.
    pub fn clips(&self) -> &OrderedList<Clip> {
        &self.clips
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selection.contains(id)
    }

    pub fn clip(&self, id: NodeId) -> Option<&Clip> {
        self.clips.get(id)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Sum of all clip durations.
    pub fn total_duration(&self) -> RationalTime {
        self.clips.sum(|clip| clip.duration)
    }
}

// ── Queries ─────────────────────────────────────────────────────

/// Where a timeline position lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekHit<'a> {
    /// Node playing at the position
    pub node: NodeId,
    /// Its clip
    pub clip: &'a Clip,
    /// How far into the clip the position is
    pub offset: RationalTime,
}

impl SeekHit<'_> {
    /// Asset time the media element should seek to.
    pub fn media_time(&self) -> RationalTime {
        self.clip.start_time + self.offset
    }
}

/// How much of one clip falls inside a viewport window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleClip {
    pub node: NodeId,
    /// Visible length; zero when the clip is outside the window
    pub length: RationalTime,
}

// ── Editor state ────────────────────────────────────────────────

/// The reducer's value: present snapshot plus undo/redo history.
///
/// Cloning is cheap; snapshots are shared through `Arc`.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub(crate) present: Arc<ClipsState>,
    pub(crate) history: History<Arc<ClipsState>>,
    pub(crate) config: EditorConfig,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl PartialEq for EditorState {
    fn eq(&self, other: &Self) -> bool {
        self.present == other.present && self.history == other.history && self.config == other.config
    }
}

impl EditorState {
    /// Start an empty session.
    pub fn new(config: EditorConfig) -> Self {
        let history = History::new(config.undo_states);
        Self {
            present: Arc::new(ClipsState::new()),
            history,
            config,
        }
    }

    /// Start a session from an externally supplied clip list.
    pub fn with_clips(config: EditorConfig, clips: impl IntoIterator<Item = Clip>) -> EditResult<Self> {
        let mut list = OrderedList::new();
        for clip in clips {
            clip.validate(config.minimum_clip_length)?;
            list.append(clip);
        }
        let history = History::new(config.undo_states);
        Ok(Self {
            present: Arc::new(ClipsState {
                clips: list,
                selection: Selection::new(),
            }),
            history,
            config,
        })
    }

    /// Apply one action, producing the next state. `self` is untouched.
    pub fn reduce(&self, action: ClipAction) -> EditResult<Self> {
        reducer::reduce(self, action)
    }

    /// The current snapshot.
    pub fn present(&self) -> &ClipsState {
        &self.present
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<ClipsState> {
        Arc::clone(&self.present)
    }

    pub fn clips(&self) -> &OrderedList<Clip> {
        &self.present.clips
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.present.is_selected(id)
    }

    /// Total timeline duration.
    pub fn total_duration(&self) -> RationalTime {
        self.present.total_duration()
    }

    /// Resolve a timeline position to a clip and an offset into it.
    pub fn seek(&self, time: RationalTime) -> Option<SeekHit<'_>> {
        let clips = &self.present.clips;
        let (node, offset) = clips.find_by_accumulated_sum(time, |clip| clip.duration)?;
        let clip = clips.get(node)?;
        Some(SeekHit { node, clip, offset })
    }

    /// Asset time to hand the media element for a timeline position.
    pub fn media_time(&self, time: RationalTime) -> Option<RationalTime> {
        self.seek(time).map(|hit| hit.media_time())
    }

    /// Timeline position where a clip starts.
    pub fn clip_start(&self, node: NodeId) -> Option<RationalTime> {
        self.present
            .clips
            .accumulated_before(node, |clip| clip.duration)
    }

    /// Re-derive the global position from a playback report: `elapsed`
    /// seconds into the clip at `node`.
    pub fn timeline_time(&self, node: NodeId, elapsed: RationalTime) -> Option<RationalTime> {
        self.clip_start(node).map(|start| start + elapsed)
    }

    /// Visible length of every clip inside `[lower, upper]`, in timeline
    /// order.
    pub fn visible_clip_lengths(&self, lower: RationalTime, upper: RationalTime) -> Vec<VisibleClip> {
        let window = TimeRange::from_start_end(lower, upper);
        let mut start = RationalTime::ZERO;
        self.present
            .clips
            .iter()
            .map(|node| {
                let span = TimeRange::new(start, node.data().duration);
                start = span.end();
                let length = span
                    .intersection(window)
                    .map_or(RationalTime::ZERO, |visible| visible.duration);
                VisibleClip {
                    node: node.id(),
                    length,
                }
            })
            .collect()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_count()
    }

    /// Number of redo steps available.
    pub fn redo_depth(&self) -> usize {
        self.history.redo_count()
    }

    /// Structural checks: list links, selection membership, clip windows,
    /// and the history bound.
    pub fn is_consistent(&self) -> bool {
        let present = &self.present;
        present.clips.check_links()
            && present.selection.is_subset_of(&present.clips)
            && present
                .clips
                .all(|clip| clip.validate(self.config.minimum_clip_length).is_ok())
            && self.history.undo_count() <= self.history.capacity()
    }
}
