// Item Domain Model

use serde::Serialize;
use std::fmt;

/// Priority (higher number = higher priority, served first)
pub type Priority = i32;

/// Insertion sequence number, assigned by the queue
pub type Sequence = u64;

/// A unit of work as handed to the queue, before it has a sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkUnit<T> {
    pub priority: Priority,
    pub payload: T,
}

impl<T> WorkUnit<T> {
    pub fn new(priority: Priority, payload: T) -> Self {
        Self { priority, payload }
    }
}

/// An item resident in (or taken from) a queue.
///
/// Items are only created by the queue's insertion path, so `sequence` is
/// unique per queue instance and matches insertion order. Ordering lives in
/// the ready set's comparator, not on the item.
#[derive(Debug, Serialize)]
pub struct Item<T> {
    priority: Priority,
    sequence: Sequence,
    payload: T,
}

impl<T> Item<T> {
    pub(crate) fn new(priority: Priority, sequence: Sequence, payload: T) -> Self {
        Self {
            priority,
            sequence,
            payload,
        }
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Consume the item, keeping only its payload
    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T: fmt::Display> fmt::Display for Item<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.priority, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_shows_priority_then_payload() {
        let item = Item::new(7, 3, "Producer1_item_0");
        assert_eq!(item.to_string(), "[7] Producer1_item_0");
    }

    #[test]
    fn test_into_payload_releases_ownership() {
        let item = Item::new(1, 0, vec![1u8, 2, 3]);
        assert_eq!(item.priority(), 1);
        assert_eq!(item.sequence(), 0);
        assert_eq!(item.into_payload(), vec![1, 2, 3]);
    }
}
