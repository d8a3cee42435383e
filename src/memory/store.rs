use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use super::features::TaskFeatures;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMemory {
    pub task_id: String,
    pub program_source: String,
    pub task_features: TaskFeatures,
    pub success: bool,
    pub robustness_score: f64,
    pub usage_count: u64,
    pub timestamp_ms: u64,
}

/// Stable content key over `task_id + program_source`, independent of insertion order.
pub fn content_key(task_id: &str, program_source: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    task_id.hash(&mut hasher);
    program_source.hash(&mut hasher);
    hasher.finish()
}

pub trait MemoryStore {
    fn insert(&mut self, record: SolutionMemory);
    fn lookup(&self, key: u64) -> Option<&SolutionMemory>;
    fn all(&self) -> Vec<&SolutionMemory>;
}

/// In-process store keyed by content hash. The only `MemoryStore` implementation
/// required by a single-solve invocation; `PersistentMemoryStore` is a documented
/// extension point, not implemented here (see DESIGN.md).
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: HashMap<u64, SolutionMemory>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record_usage(&mut self, key: u64) {
        if let Some(record) = self.records.get_mut(&key) {
            record.usage_count += 1;
        }
    }
}

impl MemoryStore for InMemoryStore {
    fn insert(&mut self, record: SolutionMemory) {
        let key = content_key(&record.task_id, &record.program_source);
        self.records.insert(key, record);
    }

    fn lookup(&self, key: u64) -> Option<&SolutionMemory> {
        self.records.get(&key)
    }

    fn all(&self) -> Vec<&SolutionMemory> {
        self.records.values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::features::TaskFeatures;

    fn sample(task_id: &str, source: &str) -> SolutionMemory {
        SolutionMemory {
            task_id: task_id.to_string(),
            program_source: source.to_string(),
            task_features: TaskFeatures::default(),
            success: true,
            robustness_score: 1.0,
            usage_count: 0,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn insert_then_lookup_round_trips() {
        let mut store = InMemoryStore::new();
        let record = sample("t1", "identity");
        let key = content_key("t1", "identity");
        store.insert(record);
        assert!(store.lookup(key).is_some());
    }

    #[test]
    fn same_task_and_source_collide_to_same_key() {
        assert_eq!(content_key("t1", "identity"), content_key("t1", "identity"));
        assert_ne!(content_key("t1", "identity"), content_key("t2", "identity"));
    }
}
