//! Ordered node collection backing the clip timeline.
//!
//! A doubly-linked list stored as an arena: nodes live in a map keyed by
//! their [`NodeId`], and `prev`/`next` links are ids rather than owning
//! references. Node identity is assigned once, from a process-wide counter,
//! and survives reordering, so it is the handle used for selection,
//! deletion and duplication.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Add, Sub};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{EditError, EditResult};

// ── Identity ────────────────────────────────────────────────────

/// Stable identity of a node. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw integer value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── Nodes ───────────────────────────────────────────────────────

/// One element of an [`OrderedList`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    id: NodeId,
    data: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl<T> Node<T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }
}

/// Result of a batch delete or duplicate.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<V> {
    /// Aggregate value of the affected nodes.
    pub total: V,
    /// Removed nodes (delete) or newly created nodes (duplicate), in list order.
    pub nodes: Vec<NodeId>,
}

// ── List ────────────────────────────────────────────────────────

/// Doubly-linked list of `T` with stable node identities.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedList<T> {
    nodes: HashMap<NodeId, Node<T>>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderedList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    /// Look up a node by identity.
    pub fn find(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(&id)
    }

    /// Data of the node with the given identity.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(&id).map(|node| &node.data)
    }

    /// Mutable data of the node with the given identity.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(&id).map(|node| &mut node.data)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Identity of the node at a position, counting from the head.
    pub fn node_at(&self, index: usize) -> Option<NodeId> {
        self.iter().nth(index).map(Node::id)
    }

    /// Position of a node, counting from the head.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.iter().position(|node| node.id == id)
    }

    /// Forward traversal from head to tail. Reverse with `.rev()`.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.nodes.len(),
        }
    }

    /// Node identities in list order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.iter().map(Node::id)
    }

    /// Node data in list order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.iter().map(Node::data)
    }

    // ── Insertion ───────────────────────────────────────────────

    /// Add a node at the tail.
    pub fn append(&mut self, data: T) -> NodeId {
        let id = NodeId::next();
        self.link_before(id, data, None);
        id
    }

    /// Add a node at the head.
    pub fn prepend(&mut self, data: T) -> NodeId {
        let id = NodeId::next();
        let head = self.head;
        self.link_before(id, data, head);
        id
    }

    /// Insert a node immediately before `before`, or at the tail when
    /// `before` is `None`. Returns `None` if `before` is not in the list.
    pub fn insert_before(&mut self, data: T, before: Option<NodeId>) -> Option<NodeId> {
        if let Some(before) = before {
            if !self.contains(before) {
                return None;
            }
        }
        let id = NodeId::next();
        self.link_before(id, data, before);
        Some(id)
    }

    /// Insert a node so that it ends up at `index` (`0..=len`).
    pub fn insert_at(&mut self, index: usize, data: T) -> EditResult<NodeId> {
        let len = self.len();
        if index > len {
            return Err(EditError::InvalidIndex { index, len });
        }
        let before = self.node_at(index);
        let id = NodeId::next();
        self.link_before(id, data, before);
        Ok(id)
    }

    fn link_before(&mut self, id: NodeId, data: T, before: Option<NodeId>) {
        let prev = match before {
            Some(before) => self.nodes.get(&before).and_then(|node| node.prev),
            None => self.tail,
        };

        self.nodes.insert(
            id,
            Node {
                id,
                data,
                prev,
                next: before,
            },
        );

        match prev.and_then(|prev| self.nodes.get_mut(&prev)) {
            Some(prev_node) => prev_node.next = Some(id),
            None => self.head = Some(id),
        }
        match before.and_then(|before| self.nodes.get_mut(&before)) {
            Some(next_node) => next_node.prev = Some(id),
            None => self.tail = Some(id),
        }
    }

    // ── Removal and reordering ──────────────────────────────────

    fn unlink(&mut self, id: NodeId) -> Option<Node<T>> {
        let node = self.nodes.remove(&id)?;

        match node.prev.and_then(|prev| self.nodes.get_mut(&prev)) {
            Some(prev_node) => prev_node.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|next| self.nodes.get_mut(&next)) {
            Some(next_node) => next_node.prev = node.prev,
            None => self.tail = node.prev,
        }

        Some(node)
    }

    /// Remove a node by identity, returning its data.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        self.unlink(id).map(|node| node.data)
    }

    /// Remove the node at `index` (`0..len`).
    pub fn remove_at(&mut self, index: usize) -> EditResult<(NodeId, T)> {
        let len = self.len();
        let node = self
            .node_at(index)
            .and_then(|id| self.unlink(id))
            .ok_or(EditError::InvalidIndex { index, len })?;
        Ok((node.id, node.data))
    }

    /// Relocate the node at `from` so that it ends up at `to`, keeping its
    /// identity. Both indices must be in `0..len`.
    pub fn move_to(&mut self, from: usize, to: usize) -> EditResult<NodeId> {
        let len = self.len();
        if to >= len {
            return Err(EditError::InvalidIndex { index: to, len });
        }
        let node = self
            .node_at(from)
            .and_then(|id| self.unlink(id))
            .ok_or(EditError::InvalidIndex { index: from, len })?;

        let before = self.node_at(to);
        self.link_before(node.id, node.data, before);
        Ok(node.id)
    }

    /// Remove every node whose identity is in `ids`. Unknown ids are
    /// ignored. Returns the summed `value` of the removed nodes.
    pub fn delete_nodes<V, F>(&mut self, ids: &[NodeId], value: F) -> BatchOutcome<V>
    where
        V: Add<Output = V> + Default,
        F: Fn(&T) -> V,
    {
        let wanted: HashSet<NodeId> = ids.iter().copied().collect();
        let targets: Vec<NodeId> = self.ids().filter(|id| wanted.contains(id)).collect();

        let mut total = V::default();
        for &id in &targets {
            if let Some(node) = self.unlink(id) {
                total = total + value(&node.data);
            }
        }

        BatchOutcome {
            total,
            nodes: targets,
        }
    }

    // ── Aggregates ──────────────────────────────────────────────

    /// Sum of `value` over all nodes.
    pub fn sum<V, F>(&self, value: F) -> V
    where
        V: Add<Output = V> + Default,
        F: Fn(&T) -> V,
    {
        self.values().fold(V::default(), |acc, data| acc + value(data))
    }

    /// Seek by accumulated value.
    ///
    /// Walks from the head keeping a running total of `value`. Returns the
    /// first node whose span `[before, before + value)` contains `target`,
    /// together with `target - before`. Targets below zero or at/after the
    /// total are not found. Zero-valued nodes never match.
    pub fn find_by_accumulated_sum<V, F>(&self, target: V, value: F) -> Option<(NodeId, V)>
    where
        V: Copy + Add<Output = V> + Sub<Output = V> + PartialOrd + Default,
        F: Fn(&T) -> V,
    {
        if target < V::default() {
            return None;
        }

        let mut before = V::default();
        for node in self.iter() {
            let end = before + value(&node.data);
            if target < end {
                return Some((node.id, target - before));
            }
            before = end;
        }
        None
    }

    /// Total `value` of the nodes preceding `id`, or `None` if absent.
    pub fn accumulated_before<V, F>(&self, id: NodeId, value: F) -> Option<V>
    where
        V: Add<Output = V> + Default,
        F: Fn(&T) -> V,
    {
        let mut before = V::default();
        for node in self.iter() {
            if node.id == id {
                return Some(before);
            }
            before = before + value(&node.data);
        }
        None
    }

    /// Check if any node's data satisfies `pred`.
    pub fn any<F: Fn(&T) -> bool>(&self, pred: F) -> bool {
        self.values().any(pred)
    }

    /// Check if every node's data satisfies `pred`. True for an empty list.
    pub fn all<F: Fn(&T) -> bool>(&self, pred: F) -> bool {
        self.values().all(pred)
    }

    /// Verify the link structure: acyclic, consistent back-links, and a
    /// forward walk from head that visits exactly `len` nodes and ends at
    /// tail.
    pub fn check_links(&self) -> bool {
        if let Some(head) = self.head.and_then(|id| self.nodes.get(&id)) {
            if head.prev.is_some() {
                return false;
            }
        }

        let mut visited = 0;
        let mut prev: Option<NodeId> = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(node) = self.nodes.get(&id) else {
                return false;
            };
            if node.prev != prev || visited >= self.nodes.len() {
                return false;
            }
            visited += 1;
            prev = Some(id);
            cursor = node.next;
        }

        visited == self.nodes.len() && prev == self.tail
    }
}

impl<T: Clone> OrderedList<T> {
    /// Duplicate every node whose identity is in `ids`, appending the copies
    /// at the tail in their original relative order. Only nodes present
    /// before the call are considered. Returns the summed `value` of the
    /// copies and their new identities.
    pub fn append_nodes<V, F>(&mut self, ids: &[NodeId], value: F) -> BatchOutcome<V>
    where
        V: Add<Output = V> + Default,
        F: Fn(&T) -> V,
    {
        let wanted: HashSet<NodeId> = ids.iter().copied().collect();
        let copies: Vec<T> = self
            .iter()
            .filter(|node| wanted.contains(&node.id))
            .map(|node| node.data.clone())
            .collect();

        let mut total = V::default();
        let mut nodes = Vec::with_capacity(copies.len());
        for data in copies {
            total = total + value(&data);
            nodes.push(self.append(data));
        }

        BatchOutcome { total, nodes }
    }

    /// Split the node located by [`find_by_accumulated_sum`](Self::find_by_accumulated_sum).
    ///
    /// A target landing exactly on a node boundary is a no-op. Otherwise
    /// `split(data, offset)` yields `(first, second)`: the located node keeps
    /// its identity and holds `second`, and a new node holding `first` is
    /// inserted right before it. Returns the new node, or `None` when nothing
    /// was split (not found, boundary, or `split` declined).
    pub fn split<V, F, S>(&mut self, target: V, value: F, split: S) -> Option<NodeId>
    where
        V: Copy + Add<Output = V> + Sub<Output = V> + PartialOrd + Default,
        F: Fn(&T) -> V,
        S: FnOnce(&T, V) -> Option<(T, T)>,
    {
        let (id, offset) = self.find_by_accumulated_sum(target, value)?;
        if offset == V::default() {
            return None;
        }

        let (first, second) = split(self.get(id)?, offset)?;
        if let Some(data) = self.get_mut(id) {
            *data = second;
        }
        self.insert_before(first, Some(id))
    }
}

impl<T> FromIterator<T> for OrderedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for OrderedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for data in iter {
            self.append(data);
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a Node<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ── Traversal ───────────────────────────────────────────────────

/// Double-ended traversal over an [`OrderedList`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    list: &'a OrderedList<T>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.nodes.get(&self.front?)?;
        self.front = node.next;
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.nodes.get(&self.back?)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(node)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
