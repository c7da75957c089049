// ID Provider Port (run identifiers)

/// Source of run identifiers (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Identifier for a new coordinator run
    fn next_run_id(&self) -> String;
}

/// UUID v4 provider (production)
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn next_run_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

pub mod mocks {
    use super::IdProvider;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Yields `run-1`, `run-2`, ...
    #[derive(Default)]
    pub struct SequentialIdProvider {
        counter: AtomicU64,
    }

    impl IdProvider for SequentialIdProvider {
        fn next_run_id(&self) -> String {
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            format!("run-{}", n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::SequentialIdProvider;
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdProvider::default();
        assert_eq!(ids.next_run_id(), "run-1");
        assert_eq!(ids.next_run_id(), "run-2");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        assert_ne!(UuidProvider.next_run_id(), UuidProvider.next_run_id());
    }
}
