// Work Sink Port
// Accepts items dequeued by consumers

use super::work_error::WorkError;
use crate::domain::Item;
use std::fmt::Display;
use tracing::info;

/// Destination for dequeued items, shared by all consumers of a run
pub trait WorkSink<T>: Send + Sync {
    /// Process one item on behalf of `consumer`
    ///
    /// # Errors
    /// Any error stops the consumer and is reported by the coordinator.
    fn accept(&self, consumer: &str, item: Item<T>) -> Result<(), WorkError>;
}

/// Logs every item it receives (production default)
pub struct LoggingSink;

impl<T: Display + Send> WorkSink<T> for LoggingSink {
    fn accept(&self, consumer: &str, item: Item<T>) -> Result<(), WorkError> {
        info!(
            consumer = %consumer,
            priority = item.priority(),
            sequence = item.sequence(),
            "{} processing: {}",
            consumer,
            item
        );
        Ok(())
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::{Priority, Sequence};
    use std::sync::Mutex;

    /// What a consumer handed to the sink
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Delivery<T> {
        pub consumer: String,
        pub priority: Priority,
        pub sequence: Sequence,
        pub payload: T,
    }

    /// Keeps every delivery, in arrival order
    pub struct RecordingSink<T> {
        deliveries: Mutex<Vec<Delivery<T>>>,
    }

    impl<T> RecordingSink<T> {
        pub fn new() -> Self {
            Self {
                deliveries: Mutex::new(Vec::new()),
            }
        }

        pub fn deliveries(&self) -> Vec<Delivery<T>>
        where
            T: Clone,
        {
            self.deliveries.lock().unwrap().clone()
        }

        pub fn len(&self) -> usize {
            self.deliveries.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl<T> Default for RecordingSink<T> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<T: Send> WorkSink<T> for RecordingSink<T> {
        fn accept(&self, consumer: &str, item: Item<T>) -> Result<(), WorkError> {
            let delivery = Delivery {
                consumer: consumer.to_string(),
                priority: item.priority(),
                sequence: item.sequence(),
                payload: item.into_payload(),
            };
            self.deliveries.lock().unwrap().push(delivery);
            Ok(())
        }
    }

    /// Mock sink behavior
    #[derive(Debug, Clone)]
    pub enum SinkBehavior {
        /// Reject every item with message
        Reject(String),
        /// Panic with message (for panic isolation testing)
        Panic(String),
    }

    /// Sink that never accepts anything
    pub struct BrokenSink {
        behavior: SinkBehavior,
    }

    impl BrokenSink {
        pub fn rejecting(message: impl Into<String>) -> Self {
            Self {
                behavior: SinkBehavior::Reject(message.into()),
            }
        }

        pub fn panicking(message: impl Into<String>) -> Self {
            Self {
                behavior: SinkBehavior::Panic(message.into()),
            }
        }
    }

    impl<T: Send> WorkSink<T> for BrokenSink {
        fn accept(&self, _consumer: &str, _item: Item<T>) -> Result<(), WorkError> {
            match &self.behavior {
                SinkBehavior::Reject(msg) => Err(WorkError::Sink(msg.clone())),
                SinkBehavior::Panic(msg) => panic!("{}", msg),
            }
        }
    }
}
