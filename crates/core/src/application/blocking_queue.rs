// Bounded Priority Blocking Queue
//
// One mutex guards the ready set, the closed flag and the counters. Two
// condition variables carry the wake-ups: `not_full` for producers and
// `not_empty` for consumers. Every wake-up is a broadcast; each waiter
// re-checks its own predicate before acting.

use crate::domain::{
    Item, Priority, PutRejected, QueueError, QueueState, QueueStats, ReadySet, Sequence,
};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// State behind the queue's single lock
struct Inner<T> {
    ready: ReadySet<T>,
    closed: bool,
    stats: QueueStats,
}

/// Bounded, priority-ordered, thread-safe blocking queue.
///
/// Share it between threads with `Arc`. Among ready items the highest
/// priority is served first; equal priorities are served in insertion order.
///
/// # Example
/// ```
/// use prioq_core::application::PriorityBlockingQueue;
///
/// let queue = PriorityBlockingQueue::new(3).unwrap();
/// queue.put(5, "A").unwrap();
/// queue.put(5, "B").unwrap();
/// queue.put(9, "C").unwrap();
///
/// let order: Vec<_> = (0..3).map(|_| queue.take().unwrap().into_payload()).collect();
/// assert_eq!(order, vec!["C", "A", "B"]);
/// ```
pub struct PriorityBlockingQueue<T> {
    capacity: usize,
    inner: Mutex<Inner<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> PriorityBlockingQueue<T> {
    /// Create an open, empty queue
    ///
    /// # Errors
    /// - `QueueError::InvalidCapacity` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            inner: Mutex::new(Inner {
                ready: ReadySet::with_capacity(capacity),
                closed: false,
                stats: QueueStats::default(),
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        })
    }

    // Poison is recovered: every critical section below is a single update
    // that cannot be observed half-done.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a payload, blocking while the queue is full.
    ///
    /// Returns the sequence number the item was stamped with.
    ///
    /// # Errors
    /// - `QueueError::Closed` if the queue is (or becomes, while waiting) closed.
    ///   The payload is handed back inside the rejection.
    pub fn put(&self, priority: Priority, payload: T) -> Result<Sequence, PutRejected<T>> {
        let mut inner = self.lock();
        loop {
            if inner.closed {
                return Err(PutRejected::new(QueueError::Closed, payload));
            }
            if inner.ready.len() < self.capacity {
                break;
            }
            inner.stats.producer_waits += 1;
            debug!(capacity = self.capacity, "Queue full, producer waiting");
            inner = self
                .not_full
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
        let sequence = self.insert_locked(&mut inner, priority, payload);
        drop(inner);
        self.not_empty.notify_all();
        Ok(sequence)
    }

    /// Like [`put`](Self::put), but gives up after `timeout`.
    ///
    /// # Errors
    /// - `QueueError::Closed` as for `put`
    /// - `QueueError::Timeout` if no capacity freed up in time
    pub fn put_timeout(
        &self,
        priority: Priority,
        payload: T,
        timeout: Duration,
    ) -> Result<Sequence, PutRejected<T>> {
        // No representable deadline means it can never be reached
        let deadline = Instant::now().checked_add(timeout);
        let mut inner = self.lock();
        loop {
            if inner.closed {
                return Err(PutRejected::new(QueueError::Closed, payload));
            }
            if inner.ready.len() < self.capacity {
                break;
            }
            let remaining = match deadline {
                Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
                    Some(remaining) if !remaining.is_zero() => Some(remaining),
                    _ => return Err(PutRejected::new(QueueError::Timeout(timeout), payload)),
                },
                None => None,
            };
            inner.stats.producer_waits += 1;
            debug!(capacity = self.capacity, "Queue full, producer waiting (bounded)");
            inner = match remaining {
                Some(remaining) => {
                    self.not_full
                        .wait_timeout(inner, remaining)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .not_full
                    .wait(inner)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
        let sequence = self.insert_locked(&mut inner, priority, payload);
        drop(inner);
        self.not_empty.notify_all();
        Ok(sequence)
    }

    /// Insert without waiting.
    ///
    /// # Errors
    /// - `QueueError::Closed` if the queue is closed
    /// - `QueueError::Full` if the queue is at capacity
    pub fn try_put(&self, priority: Priority, payload: T) -> Result<Sequence, PutRejected<T>> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(PutRejected::new(QueueError::Closed, payload));
        }
        if inner.ready.len() >= self.capacity {
            return Err(PutRejected::new(QueueError::Full, payload));
        }
        let sequence = self.insert_locked(&mut inner, priority, payload);
        drop(inner);
        self.not_empty.notify_all();
        Ok(sequence)
    }

    /// Remove the highest-priority item, blocking while the queue is empty.
    ///
    /// Items still resident after `close()` are drained in order first.
    ///
    /// # Errors
    /// - `QueueError::Closed` once the queue is closed and empty
    pub fn take(&self) -> Result<Item<T>, QueueError> {
        let mut inner = self.lock();
        loop {
            if let Some(item) = self.remove_locked(&mut inner) {
                drop(inner);
                self.not_full.notify_all();
                return Ok(item);
            }
            if inner.closed {
                return Err(QueueError::Closed);
            }
            inner.stats.consumer_waits += 1;
            debug!("Queue empty, consumer waiting");
            inner = self
                .not_empty
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`take`](Self::take), but gives up after `timeout`.
    ///
    /// # Errors
    /// - `QueueError::Closed` as for `take`
    /// - `QueueError::Timeout` if nothing arrived in time
    pub fn take_timeout(&self, timeout: Duration) -> Result<Item<T>, QueueError> {
        let deadline = Instant::now().checked_add(timeout);
        let mut inner = self.lock();
        loop {
            if let Some(item) = self.remove_locked(&mut inner) {
                drop(inner);
                self.not_full.notify_all();
                return Ok(item);
            }
            if inner.closed {
                return Err(QueueError::Closed);
            }
            let remaining = match deadline {
                Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
                    Some(remaining) if !remaining.is_zero() => Some(remaining),
                    _ => return Err(QueueError::Timeout(timeout)),
                },
                None => None,
            };
            inner.stats.consumer_waits += 1;
            debug!("Queue empty, consumer waiting (bounded)");
            inner = match remaining {
                Some(remaining) => {
                    self.not_empty
                        .wait_timeout(inner, remaining)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .not_empty
                    .wait(inner)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }

    /// Remove without waiting.
    ///
    /// # Errors
    /// - `QueueError::Closed` if the queue is closed and empty
    /// - `QueueError::Empty` if the queue is open and empty
    pub fn try_take(&self) -> Result<Item<T>, QueueError> {
        let mut inner = self.lock();
        match self.remove_locked(&mut inner) {
            Some(item) => {
                drop(inner);
                self.not_full.notify_all();
                Ok(item)
            }
            None if inner.closed => Err(QueueError::Closed),
            None => Err(QueueError::Empty),
        }
    }

    /// Close the queue and wake every blocked producer and consumer.
    ///
    /// Idempotent. Returns `true` only for the call that actually closed it.
    pub fn close(&self) -> bool {
        let mut inner = self.lock();
        if inner.closed {
            return false;
        }
        inner.closed = true;
        info!(remaining = inner.ready.len(), "Queue closed");
        drop(inner);
        self.not_full.notify_all();
        self.not_empty.notify_all();
        true
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().ready.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Current lifecycle state (a snapshot; may change immediately after)
    pub fn state(&self) -> QueueState {
        let inner = self.lock();
        QueueState::from_snapshot(inner.ready.len(), self.capacity, inner.closed)
    }

    pub fn stats(&self) -> QueueStats {
        self.lock().stats.clone()
    }

    fn insert_locked(&self, inner: &mut Inner<T>, priority: Priority, payload: T) -> Sequence {
        let sequence = inner.ready.insert(priority, payload);
        inner.stats.put += 1;
        debug!(priority, sequence, size = inner.ready.len(), "Produced");
        sequence
    }

    fn remove_locked(&self, inner: &mut Inner<T>) -> Option<Item<T>> {
        let item = inner.ready.pop()?;
        inner.stats.taken += 1;
        debug!(
            priority = item.priority(),
            sequence = item.sequence(),
            size = inner.ready.len(),
            "Consumed"
        );
        Some(item)
    }
}

impl<T> std::fmt::Debug for PriorityBlockingQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("PriorityBlockingQueue")
            .field("capacity", &self.capacity)
            .field("len", &inner.ready.len())
            .field("closed", &inner.closed)
            .finish()
    }
}
