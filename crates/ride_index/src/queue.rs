//! Array-backed min-heap of rides with O(log n) removal by handle.
//!
//! Entries live in a slab and are referenced by [`EntryId`]. The heap array
//! holds handles in heap order, and every entry records its own array slot so
//! an arbitrary entry can be removed or re-keyed without searching.

use crate::error::RideError;
use crate::index::NodeId;
use crate::ride::{RideKey, RideRecord};

/// Generation-checked handle to a [`PriorityEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId {
    index: u32,
    generation: u32,
}

impl EntryId {
    /// Placeholder for an index node whose entry is not linked yet.
    pub const NONE: EntryId = EntryId {
        index: u32::MAX,
        generation: u32::MAX,
    };

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

#[derive(Debug, Clone)]
pub struct PriorityEntry {
    record: RideRecord,
    slot: usize,
    node: NodeId,
}

impl PriorityEntry {
    pub fn record(&self) -> &RideRecord {
        &self.record
    }

    pub fn key(&self) -> RideKey {
        self.record.key()
    }

    /// Current position in the heap array.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Paired node in the ordered index.
    pub fn node(&self) -> NodeId {
        self.node
    }
}

#[derive(Debug, Default)]
struct SlabSlot {
    generation: u32,
    entry: Option<PriorityEntry>,
}

#[derive(Debug, Default)]
pub struct PriorityQueue {
    /// Heap-ordered entry handles.
    heap: Vec<EntryId>,
    slab: Vec<SlabSlot>,
    free_list: Vec<u32>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            slab: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the entry behind `id`, or `None` if the handle is stale.
    pub fn try_get(&self, id: EntryId) -> Option<&PriorityEntry> {
        self.slab
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    /// # Panics
    ///
    /// Panics if `id` does not refer to a live entry.
    pub fn get(&self, id: EntryId) -> &PriorityEntry {
        self.try_get(id).expect("stale priority entry handle")
    }

    fn entry_mut(&mut self, id: EntryId) -> &mut PriorityEntry {
        self.slab
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
            .expect("stale priority entry handle")
    }

    /// The cheapest entry, without removing it.
    pub fn peek(&self) -> Option<&PriorityEntry> {
        self.heap.first().map(|&id| self.get(id))
    }

    /// Entries in heap-array order, paired with their array position.
    pub fn slots(&self) -> impl Iterator<Item = (usize, &PriorityEntry)> + '_ {
        self.heap
            .iter()
            .enumerate()
            .map(move |(slot, &id)| (slot, self.get(id)))
    }

    /// Pushes a ride paired with `node` and returns the new entry's handle.
    pub fn push(&mut self, record: RideRecord, node: NodeId) -> EntryId {
        let slot = self.heap.len();
        let id = self.alloc(PriorityEntry { record, slot, node });
        self.heap.push(id);
        self.sift_up(slot);
        id
    }

    /// Removes and returns the cheapest entry.
    pub fn pop_min(&mut self) -> Result<PriorityEntry, RideError> {
        if self.heap.is_empty() {
            return Err(RideError::EmptyQueue);
        }
        let root = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.place(0);
            self.sift_down(0);
        }
        Ok(self.release(root))
    }

    /// Removes the entry behind `id` from wherever it sits in the heap.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale or its recorded slot is out of sync.
    pub fn remove_at(&mut self, id: EntryId) -> PriorityEntry {
        let slot = self.get(id).slot;
        assert!(
            slot < self.heap.len() && self.heap[slot] == id,
            "priority entry slot {slot} out of sync"
        );

        self.heap.swap_remove(slot);
        if slot < self.heap.len() {
            // The former last entry came from another subtree; it may belong
            // above or below `slot`.
            self.place(slot);
            if slot > 0 && self.key_at(slot) < self.key_at(parent_of(slot)) {
                self.sift_up(slot);
            } else {
                self.sift_down(slot);
            }
        }
        self.release(id)
    }

    /// Re-keys the entry behind `id` and moves it to restore heap order.
    pub fn update_key(&mut self, id: EntryId, ride_cost: u64, trip_duration: u64) {
        let entry = self.entry_mut(id);
        let old_key = entry.key();
        entry.record.ride_cost = ride_cost;
        entry.record.trip_duration = trip_duration;
        let slot = entry.slot;

        let new_key = RideKey::new(ride_cost, trip_duration);
        if new_key > old_key {
            self.sift_down(slot);
        } else if new_key < old_key {
            self.sift_up(slot);
        }
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = parent_of(slot);
            if self.key_at(parent) <= self.key_at(slot) {
                break;
            }
            self.swap_slots(parent, slot);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = left_child_of(slot);
            if left >= self.heap.len() {
                break;
            }
            let right = left + 1;
            let child = if right < self.heap.len() && self.key_at(right) < self.key_at(left) {
                right
            } else {
                left
            };
            if self.key_at(slot) <= self.key_at(child) {
                break;
            }
            self.swap_slots(slot, child);
            slot = child;
        }
    }

    fn key_at(&self, slot: usize) -> RideKey {
        self.get(self.heap[slot]).key()
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.place(a);
        self.place(b);
    }

    /// Records `slot` on the entry currently stored there.
    fn place(&mut self, slot: usize) {
        let id = self.heap[slot];
        self.entry_mut(id).slot = slot;
    }

    fn alloc(&mut self, entry: PriorityEntry) -> EntryId {
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slab[index as usize];
            debug_assert!(slot.entry.is_none());
            slot.entry = Some(entry);
            EntryId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = u32::try_from(self.slab.len()).expect("priority queue slab exhausted");
            self.slab.push(SlabSlot {
                generation: 0,
                entry: Some(entry),
            });
            EntryId {
                index,
                generation: 0,
            }
        }
    }

    fn release(&mut self, id: EntryId) -> PriorityEntry {
        let slot = &mut self.slab[id.index as usize];
        debug_assert_eq!(slot.generation, id.generation);
        let entry = slot.entry.take().expect("released entry must be live");
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index);
        entry
    }
}

#[inline]
fn parent_of(slot: usize) -> usize {
    (slot - 1) / 2
}

#[inline]
fn left_child_of(slot: usize) -> usize {
    2 * slot + 1
}
