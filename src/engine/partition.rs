//! Engine partition
//!
//! One independently locked shard of the key space.

use std::collections::HashMap;

use parking_lot::RwLock;

/// A hash table owning a disjoint subset of the key space.
///
/// The internal map is exclusive to this partition's lock; readers proceed
/// concurrently, a writer excludes everything else on the same partition only.
pub struct Partition {
    data: RwLock<HashMap<String, String>>,
}

impl Partition {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        self.data.write().insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    pub fn del(&self, key: &str) {
        self.data.write().remove(key);
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Default for Partition {
    fn default() -> Self {
        Self::new()
    }
}
