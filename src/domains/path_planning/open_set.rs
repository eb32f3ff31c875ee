//! Indexed binary min-heap backing the A* open set.
//!
//! Entries are ordered by `(f, insertion sequence)` so equal-f nodes pop in
//! the order they were first inserted. A node already in the heap can have
//! its priority lowered in place; it is never inserted twice.

use std::collections::HashMap;

use ordered_float::OrderedFloat;

type Key = (OrderedFloat<f64>, u64);

#[derive(Debug, Clone, Copy)]
struct Entry {
    node: usize,
    key: Key,
}

#[derive(Debug, Default)]
pub(crate) struct OpenSet {
    heap: Vec<Entry>,
    // Heap slot of each queued node.
    slots: HashMap<usize, usize>,
    next_seq: u64,
}

impl OpenSet {
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn contains(&self, node: usize) -> bool {
        self.slots.contains_key(&node)
    }

    /// Insert a node that is not queued yet.
    pub fn push(&mut self, node: usize, f: f64) {
        debug_assert!(!self.contains(node));
        let key = (OrderedFloat(f), self.next_seq);
        self.next_seq += 1;
        self.heap.push(Entry { node, key });
        let slot = self.heap.len() - 1;
        self.slots.insert(node, slot);
        self.sift_up(slot);
    }

    /// Lower the priority of a queued node. Returns false if the node is not
    /// queued or `f` is not an improvement.
    pub fn decrease(&mut self, node: usize, f: f64) -> bool {
        let Some(slot) = self.slots.get(&node).copied() else {
            return false;
        };
        if OrderedFloat(f) >= self.heap[slot].key.0 {
            return false;
        }
        self.heap[slot].key.0 = OrderedFloat(f);
        self.sift_up(slot);
        true
    }

    pub fn pop(&mut self) -> Option<(usize, f64)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let top = self.heap.pop()?;
        self.slots.remove(&top.node);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((top.node, top.key.0.into_inner()))
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].node, a);
        self.slots.insert(self.heap[b].node, b);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].key < self.heap[parent].key {
                self.swap(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < n && self.heap[left].key < self.heap[smallest].key {
                smallest = left;
            }
            if right < n && self.heap[right].key < self.heap[smallest].key {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_priority_then_insertion_order() {
        let mut open = OpenSet::new();
        open.push(0, 3.0);
        open.push(1, 1.0);
        open.push(2, 1.0);
        open.push(3, 2.0);

        assert_eq!(open.pop(), Some((1, 1.0)));
        assert_eq!(open.pop(), Some((2, 1.0)));
        assert_eq!(open.pop(), Some((3, 2.0)));
        assert_eq!(open.pop(), Some((0, 3.0)));
        assert!(open.pop().is_none());
    }

    #[test]
    fn decrease_updates_in_place() {
        let mut open = OpenSet::new();
        open.push(0, 5.0);
        open.push(1, 4.0);
        assert!(open.decrease(0, 1.0));
        assert!(!open.decrease(0, 2.0));
        assert!(!open.decrease(3, 0.5));
        assert_eq!(open.len(), 2);
        assert_eq!(open.pop(), Some((0, 1.0)));
        assert!(!open.contains(0));
        assert!(open.contains(1));
    }
}
