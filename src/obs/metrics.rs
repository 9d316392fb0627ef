use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Registry of named meters. Structures register their counters here when
/// constructed with observability; callers read them back by name.
#[derive(Default, Clone)]
pub struct MetricRegistry {
    counters: BTreeMap<String, Arc<Counter>>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_counter(&mut self, name: &str, counter: Arc<Counter>) -> &mut Self {
        self.counters.insert(name.to_string(), counter);
        self
    }

    pub fn get_counter(&self, name: &str) -> Option<Arc<Counter>> {
        self.counters.get(name).cloned()
    }

    /// Snapshot of all counter values, sorted by name.
    pub fn counters(&self) -> Vec<(String, u64)> {
        self.counters
            .iter()
            .map(|(name, counter)| (name.clone(), counter.get()))
            .collect()
    }
}

/// A monotonically increasing atomic counter.
#[derive(Default)]
pub struct Counter {
    atomic: AtomicU64,
}

impl Counter {
    pub fn new() -> Arc<Self> {
        Arc::new(Counter::default())
    }

    pub fn inc(&self) {
        self.atomic.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, value: u64) {
        self.atomic.fetch_add(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.atomic.load(Ordering::Relaxed)
    }
}
