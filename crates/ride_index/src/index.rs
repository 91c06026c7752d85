//! Red-black tree of rides keyed by ride number.
//!
//! Nodes live in a `Vec` arena and refer to each other through [`NodeId`]
//! indices. A node keeps its id for as long as its ride is in the tree:
//! deletion relinks nodes instead of moving payloads between them, so the
//! handles held by the priority queue stay valid across rebalancing.

use crate::error::{InvariantViolation, RideError};
use crate::queue::EntryId;
use crate::ride::{RideNumber, RideRecord};

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Placeholder for an entry not paired with any node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct IndexNode {
    record: RideRecord,
    entry: EntryId,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    red: bool,
    // false once the slot is back on the free list
    alive: bool,
}

impl IndexNode {
    fn new(record: RideRecord) -> Self {
        Self {
            record,
            entry: EntryId::NONE,
            parent: None,
            left: None,
            right: None,
            red: true,
            alive: true,
        }
    }

    pub fn record(&self) -> &RideRecord {
        &self.record
    }

    /// Paired entry in the priority queue.
    pub fn entry(&self) -> EntryId {
        self.entry
    }
}

#[derive(Debug, Default)]
pub struct OrderedIndex {
    nodes: Vec<IndexNode>,
    free_list: Vec<u32>,
    root: Option<NodeId>,
    len: usize,
}

impl OrderedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    // ===== Arena =====

    fn alloc_node(&mut self, record: RideRecord) -> NodeId {
        if let Some(index) = self.free_list.pop() {
            self.nodes[index as usize] = IndexNode::new(record);
            NodeId(index)
        } else {
            let index = u32::try_from(self.nodes.len()).expect("ordered index arena exhausted");
            self.nodes.push(IndexNode::new(record));
            NodeId(index)
        }
    }

    fn free_node(&mut self, id: NodeId) -> IndexNode {
        let node = &mut self.nodes[id.index()];
        node.alive = false;
        let detached = node.clone();
        self.free_list.push(id.0);
        detached
    }

    /// Returns the node behind `id`, or `None` if it has been freed.
    pub fn try_node(&self, id: NodeId) -> Option<&IndexNode> {
        self.nodes.get(id.index()).filter(|node| node.alive)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &IndexNode {
        debug_assert!(self.nodes[id.index()].alive);
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut IndexNode {
        debug_assert!(self.nodes[id.index()].alive);
        &mut self.nodes[id.index()]
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    fn key(&self, id: NodeId) -> RideNumber {
        self.node(id).record.ride_number
    }

    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.node(id).red)
    }

    fn is_black(&self, id: Option<NodeId>) -> bool {
        !self.is_red(id)
    }

    // ===== Lookup =====

    fn lookup(&self, ride_number: RideNumber) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let key = self.key(id);
            current = if ride_number < key {
                self.left(id)
            } else if ride_number > key {
                self.right(id)
            } else {
                return Some(id);
            };
        }
        None
    }

    pub fn find(&self, ride_number: RideNumber) -> Result<NodeId, RideError> {
        self.lookup(ride_number)
            .ok_or(RideError::NotFound(ride_number))
    }

    pub fn get(&self, ride_number: RideNumber) -> Option<&IndexNode> {
        self.lookup(ride_number).map(|id| self.node(id))
    }

    pub fn contains(&self, ride_number: RideNumber) -> bool {
        self.lookup(ride_number).is_some()
    }

    // ===== Pairing =====

    pub fn set_entry(&mut self, id: NodeId, entry: EntryId) {
        self.node_mut(id).entry = entry;
    }

    /// Overwrites the duplicated scheduling key of a node.
    pub fn set_key(&mut self, id: NodeId, ride_cost: u64, trip_duration: u64) {
        let record = &mut self.node_mut(id).record;
        record.ride_cost = ride_cost;
        record.trip_duration = trip_duration;
    }

    // ===== Rotations =====

    fn rotate_left(&mut self, node: NodeId) {
        let Some(right) = self.right(node) else {
            return;
        };

        let right_left = self.left(right);
        self.node_mut(node).right = right_left;
        if let Some(rl) = right_left {
            self.node_mut(rl).parent = Some(node);
        }

        let node_parent = self.parent(node);
        self.node_mut(right).parent = node_parent;
        match node_parent {
            None => self.root = Some(right),
            Some(parent) if self.left(parent) == Some(node) => {
                self.node_mut(parent).left = Some(right)
            }
            Some(parent) => self.node_mut(parent).right = Some(right),
        }

        self.node_mut(right).left = Some(node);
        self.node_mut(node).parent = Some(right);
    }

    fn rotate_right(&mut self, node: NodeId) {
        let Some(left) = self.left(node) else {
            return;
        };

        let left_right = self.right(left);
        self.node_mut(node).left = left_right;
        if let Some(lr) = left_right {
            self.node_mut(lr).parent = Some(node);
        }

        let node_parent = self.parent(node);
        self.node_mut(left).parent = node_parent;
        match node_parent {
            None => self.root = Some(left),
            Some(parent) if self.right(parent) == Some(node) => {
                self.node_mut(parent).right = Some(left)
            }
            Some(parent) => self.node_mut(parent).left = Some(left),
        }

        self.node_mut(left).right = Some(node);
        self.node_mut(node).parent = Some(left);
    }

    // ===== Insert =====

    /// Inserts a ride, leaving its entry handle unset.
    ///
    /// Nothing is modified when the ride number is already present.
    pub fn insert(&mut self, record: RideRecord) -> Result<NodeId, RideError> {
        let ride_number = record.ride_number;
        let mut parent = None;
        let mut current = self.root;
        while let Some(id) = current {
            let key = self.key(id);
            if ride_number == key {
                return Err(RideError::DuplicateKey(ride_number));
            }
            parent = Some(id);
            current = if ride_number < key {
                self.left(id)
            } else {
                self.right(id)
            };
        }

        let node = self.alloc_node(record);
        self.node_mut(node).parent = parent;
        match parent {
            None => self.root = Some(node),
            Some(p) if ride_number < self.key(p) => self.node_mut(p).left = Some(node),
            Some(p) => self.node_mut(p).right = Some(node),
        }
        self.len += 1;
        self.insert_fix(node);
        Ok(node)
    }

    fn insert_fix(&mut self, mut node: NodeId) {
        while let Some(parent) = self.parent(node).filter(|&p| self.node(p).red) {
            // A red parent is never the root, so the grandparent exists.
            let Some(grandparent) = self.parent(parent) else {
                break;
            };

            if Some(parent) == self.left(grandparent) {
                let uncle = self.right(grandparent);
                if self.is_red(uncle) {
                    self.node_mut(parent).red = false;
                    if let Some(u) = uncle {
                        self.node_mut(u).red = false;
                    }
                    self.node_mut(grandparent).red = true;
                    node = grandparent;
                } else {
                    if Some(node) == self.right(parent) {
                        node = parent;
                        self.rotate_left(node);
                    }
                    if let Some(parent) = self.parent(node) {
                        if let Some(grandparent) = self.parent(parent) {
                            self.node_mut(parent).red = false;
                            self.node_mut(grandparent).red = true;
                            self.rotate_right(grandparent);
                        }
                    }
                }
            } else {
                let uncle = self.left(grandparent);
                if self.is_red(uncle) {
                    self.node_mut(parent).red = false;
                    if let Some(u) = uncle {
                        self.node_mut(u).red = false;
                    }
                    self.node_mut(grandparent).red = true;
                    node = grandparent;
                } else {
                    if Some(node) == self.left(parent) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    if let Some(parent) = self.parent(node) {
                        if let Some(grandparent) = self.parent(parent) {
                            self.node_mut(parent).red = false;
                            self.node_mut(grandparent).red = true;
                            self.rotate_left(grandparent);
                        }
                    }
                }
            }
        }

        if let Some(root) = self.root {
            self.node_mut(root).red = false;
        }
    }

    // ===== Remove =====

    /// Removes the ride with the given number and returns its detached node.
    pub fn delete(&mut self, ride_number: RideNumber) -> Result<IndexNode, RideError> {
        let id = self.find(ride_number)?;
        Ok(self.remove_node(id))
    }

    fn subtree_min(&self, mut node: NodeId) -> NodeId {
        while let Some(left) = self.left(node) {
            node = left;
        }
        node
    }

    /// Puts `source` where `dest` hangs under its parent.
    fn replace_child(&mut self, source: Option<NodeId>, dest: NodeId) {
        let dest_parent = self.parent(dest);
        match dest_parent {
            None => self.root = source,
            Some(parent) if self.left(parent) == Some(dest) => self.node_mut(parent).left = source,
            Some(parent) => self.node_mut(parent).right = source,
        }
        if let Some(s) = source {
            self.node_mut(s).parent = dest_parent;
        }
    }

    /// Moves `source` into `dest`'s position, taking over its children and colour.
    fn transplant(&mut self, source: NodeId, dest: NodeId) {
        self.replace_child(Some(source), dest);

        let dest_left = self.left(dest);
        let dest_right = self.right(dest);
        let dest_red = self.node(dest).red;

        self.node_mut(source).left = dest_left;
        if let Some(l) = dest_left {
            self.node_mut(l).parent = Some(source);
        }
        self.node_mut(source).right = dest_right;
        if let Some(r) = dest_right {
            self.node_mut(r).parent = Some(source);
        }
        self.node_mut(source).red = dest_red;
    }

    /// Unlinks the node behind `id`, rebalances, and returns the detached node.
    ///
    /// # Panics
    ///
    /// Panics if `id` has already been removed.
    pub fn remove_node(&mut self, id: NodeId) -> IndexNode {
        assert!(
            self.try_node(id).is_some(),
            "ordered index node already removed"
        );

        // The node actually spliced out of its position: `id` itself, or its
        // in-order successor when `id` has two children.
        let splice = match (self.left(id), self.right(id)) {
            (Some(_), Some(right)) => self.subtree_min(right),
            _ => id,
        };
        let subtree = self.left(splice).or(self.right(splice));
        let subtree_parent = if self.parent(splice) == Some(id) {
            Some(splice)
        } else {
            self.parent(splice)
        };

        self.replace_child(subtree, splice);
        let removed_black = !self.node(splice).red;
        if splice != id {
            self.transplant(splice, id);
        }
        self.len -= 1;

        if removed_black {
            self.remove_fix(subtree, subtree_parent);
        }

        let node = self.node_mut(id);
        node.parent = None;
        node.left = None;
        node.right = None;
        self.free_node(id)
    }

    fn remove_fix(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        while let Some(p) = parent {
            if self.is_red(node) {
                break;
            }

            if node == self.left(p) {
                let Some(mut sibling) = self.right(p) else {
                    break;
                };
                if self.node(sibling).red {
                    self.node_mut(sibling).red = false;
                    self.node_mut(p).red = true;
                    self.rotate_left(p);
                    let Some(next) = self.right(p) else {
                        break;
                    };
                    sibling = next;
                }

                if self.is_black(self.left(sibling)) && self.is_black(self.right(sibling)) {
                    self.node_mut(sibling).red = true;
                    node = Some(p);
                    parent = self.parent(p);
                } else {
                    if self.is_black(self.right(sibling)) {
                        if let Some(sibling_left) = self.left(sibling) {
                            self.node_mut(sibling_left).red = false;
                        }
                        self.node_mut(sibling).red = true;
                        self.rotate_right(sibling);
                        let Some(next) = self.right(p) else {
                            break;
                        };
                        sibling = next;
                    }
                    let parent_red = self.node(p).red;
                    self.node_mut(sibling).red = parent_red;
                    self.node_mut(p).red = false;
                    if let Some(sibling_right) = self.right(sibling) {
                        self.node_mut(sibling_right).red = false;
                    }
                    self.rotate_left(p);
                    node = self.root;
                    parent = None;
                }
            } else {
                let Some(mut sibling) = self.left(p) else {
                    break;
                };
                if self.node(sibling).red {
                    self.node_mut(sibling).red = false;
                    self.node_mut(p).red = true;
                    self.rotate_right(p);
                    let Some(next) = self.left(p) else {
                        break;
                    };
                    sibling = next;
                }

                if self.is_black(self.right(sibling)) && self.is_black(self.left(sibling)) {
                    self.node_mut(sibling).red = true;
                    node = Some(p);
                    parent = self.parent(p);
                } else {
                    if self.is_black(self.left(sibling)) {
                        if let Some(sibling_right) = self.right(sibling) {
                            self.node_mut(sibling_right).red = false;
                        }
                        self.node_mut(sibling).red = true;
                        self.rotate_left(sibling);
                        let Some(next) = self.left(p) else {
                            break;
                        };
                        sibling = next;
                    }
                    let parent_red = self.node(p).red;
                    self.node_mut(sibling).red = parent_red;
                    self.node_mut(p).red = false;
                    if let Some(sibling_left) = self.left(sibling) {
                        self.node_mut(sibling_left).red = false;
                    }
                    self.rotate_right(p);
                    node = self.root;
                    parent = None;
                }
            }
        }

        if let Some(n) = node {
            self.node_mut(n).red = false;
        }
    }

    // ===== Traversal =====

    /// Rides with `low <= ride_number <= high`, ascending by ride number.
    ///
    /// Empty when `low > high`. Subtrees outside the bounds are never visited.
    pub fn range(&self, low: RideNumber, high: RideNumber) -> Range<'_> {
        let mut range = Range {
            index: self,
            stack: Vec::new(),
            low,
            high,
        };
        if low <= high {
            range.descend(self.root);
        }
        range
    }

    /// All rides, ascending by ride number.
    pub fn iter(&self) -> Range<'_> {
        self.range(RideNumber::MIN, RideNumber::MAX)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn height_of(index: &OrderedIndex, node: Option<NodeId>) -> usize {
            node.map_or(0, |id| {
                1 + height_of(index, index.left(id)).max(height_of(index, index.right(id)))
            })
        }
        height_of(self, self.root)
    }

    /// Checks BST order, parent links, red-black colouring and the node count.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if self.is_red(self.root) {
            return Err(InvariantViolation::new("root is red"));
        }
        if let Some(root) = self.root {
            if self.parent(root).is_some() {
                return Err(InvariantViolation::new("root has a parent"));
            }
        }
        let mut count = 0;
        self.validate_subtree(self.root, None, None, &mut count)?;
        if count != self.len {
            return Err(InvariantViolation::new(format!(
                "index holds {count} reachable nodes but reports {}",
                self.len
            )));
        }
        Ok(())
    }

    /// Returns the black height of the subtree.
    fn validate_subtree(
        &self,
        node: Option<NodeId>,
        lower: Option<RideNumber>,
        upper: Option<RideNumber>,
        count: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        let Some(id) = node else {
            return Ok(1);
        };
        let Some(current) = self.try_node(id) else {
            return Err(InvariantViolation::new(format!(
                "node {} is linked but freed",
                id.0
            )));
        };
        *count += 1;

        let key = current.record.ride_number;
        if lower.is_some_and(|lower| key <= lower) || upper.is_some_and(|upper| key >= upper) {
            return Err(InvariantViolation::new(format!(
                "ride {key} is out of order"
            )));
        }
        for child in [current.left, current.right].into_iter().flatten() {
            if self.parent(child) != Some(id) {
                return Err(InvariantViolation::new(format!(
                    "child of ride {key} has a wrong parent link"
                )));
            }
            if current.red && self.node(child).red {
                return Err(InvariantViolation::new(format!(
                    "red ride {key} has a red child"
                )));
            }
        }

        let left_height = self.validate_subtree(current.left, lower, Some(key), count)?;
        let right_height = self.validate_subtree(current.right, Some(key), upper, count)?;
        if left_height != right_height {
            return Err(InvariantViolation::new(format!(
                "black height differs under ride {key}"
            )));
        }
        Ok(left_height + usize::from(!current.red))
    }
}

/// Lazy in-order walk over a bounded key range of an [`OrderedIndex`].
pub struct Range<'a> {
    index: &'a OrderedIndex,
    stack: Vec<NodeId>,
    low: RideNumber,
    high: RideNumber,
}

impl Range<'_> {
    /// Pushes the path toward the smallest key `>= low` under `node`.
    fn descend(&mut self, mut node: Option<NodeId>) {
        while let Some(id) = node {
            if self.index.key(id) < self.low {
                node = self.index.right(id);
            } else {
                self.stack.push(id);
                node = self.index.left(id);
            }
        }
    }
}

impl Iterator for Range<'_> {
    type Item = RideRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let record = *self.index.node(id).record();
        if record.ride_number > self.high {
            self.stack.clear();
            return None;
        }
        self.descend(self.index.right(id));
        Some(record)
    }
}
