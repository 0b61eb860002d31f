//! Clip selection, kept outside the clip values.
//!
//! Selection is a set of node identities stored next to the clip list in each
//! snapshot, so toggling it never touches a clip shared with older history
//! entries.

use std::collections::BTreeSet;

use tracing::debug;

use crate::clip::Clip;
use crate::list::{NodeId, OrderedList};

/// Set of selected clip nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the selection of `id`. Returns the new state.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn remove(&mut self, id: NodeId) -> bool {
        self.ids.remove(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// Selected ids in timeline order.
    pub fn in_order(&self, clips: &OrderedList<Clip>) -> Vec<NodeId> {
        clips.ids().filter(|id| self.ids.contains(id)).collect()
    }

    /// Whether every selected id names a node of `clips`.
    pub fn is_subset_of(&self, clips: &OrderedList<Clip>) -> bool {
        self.ids.iter().all(|id| clips.contains(*id))
    }
}

/// Resolve the targets of a batch delete/duplicate: explicit ids when given,
/// otherwise the current selection. Unknown explicit ids are dropped.
pub(crate) fn batch_targets(
    explicit: Option<&[NodeId]>,
    selection: &Selection,
    clips: &OrderedList<Clip>,
) -> Vec<NodeId> {
    match explicit {
        Some(ids) => ids
            .iter()
            .copied()
            .filter(|id| {
                let known = clips.contains(*id);
                if !known {
                    debug!(%id, "skipping unknown clip id");
                }
                known
            })
            .collect(),
        None => selection.in_order(clips),
    }
}
