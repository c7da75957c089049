// Ready Set - priority-ordered multiset with FIFO tie-break
//
// Single-threaded. The blocking queue wraps it in its critical section.

use super::item::{Item, Priority, Sequence};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry. `BinaryHeap` is a max-heap, so the "greatest" entry is the
/// one served next: higher priority first, then lower sequence.
struct Entry<T>(Item<T>);

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .priority()
            .cmp(&other.0.priority())
            .then_with(|| other.0.sequence().cmp(&self.0.sequence()))
    }
}

/// Items eligible for immediate consumption, plus the sequence counter that
/// stamps them.
///
/// Sequence assignment and insertion happen in the same `&mut self` call,
/// so they can never be observed out of order.
pub struct ReadySet<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: Sequence,
}

impl<T> ReadySet<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Stamp and insert a payload, returning the sequence it received
    pub fn insert(&mut self, priority: Priority, payload: T) -> Sequence {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Entry(Item::new(priority, sequence, payload)));
        sequence
    }

    /// Remove the item with the highest priority (lowest sequence on ties)
    pub fn pop(&mut self) -> Option<Item<T>> {
        self.heap.pop().map(|entry| entry.0)
    }

    pub fn peek(&self) -> Option<&Item<T>> {
        self.heap.peek().map(|entry| &entry.0)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Sequence the next insertion will receive
    pub fn next_sequence(&self) -> Sequence {
        self.next_sequence
    }
}

impl<T> Default for ReadySet<T> {
    fn default() -> Self {
        Self::new()
    }
}
