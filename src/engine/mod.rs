//! Engine Module
//!
//! The in-memory key-value state, sharded into independently locked
//! partitions.
//!
//! ## Concurrency Model
//!
//! - A deterministic partition function maps each key to exactly one
//!   partition, so any operation contends on at most 1/N of the key space.
//! - Operations on disjoint partitions proceed without mutual interference;
//!   operations on the same partition are serialized by that partition's own
//!   lock. No global lock exists.
//! - Partition assignment is stable for the lifetime of the engine instance:
//!   the same key always lands on the same partition.

mod partition;

pub use partition::Partition;

use crate::error::{Result, StrataError};

/// Partitioned in-memory storage engine
pub struct InMemoryEngine {
    partitions: Vec<Partition>,
}

impl InMemoryEngine {
    /// Engine with a single partition
    pub fn new() -> Self {
        Self {
            partitions: vec![Partition::new()],
        }
    }

    /// Engine sharded into `count` partitions; `count` is fixed for the
    /// instance's lifetime
    pub fn with_partitions(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(StrataError::InvalidArgument(
                "partitions number must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            partitions: (0..count).map(|_| Partition::new()).collect(),
        })
    }

    /// Deterministic partition index for a key
    pub fn partition_index(&self, key: &str) -> usize {
        crc32fast::hash(key.as_bytes()) as usize % self.partitions.len()
    }

    fn partition_for(&self, key: &str) -> &Partition {
        &self.partitions[self.partition_index(key)]
    }

    pub fn set(&self, key: &str, value: &str) {
        self.partition_for(key).set(key, value);
    }

    pub fn get(&self, key: &str) -> Result<String> {
        self.partition_for(key)
            .get(key)
            .ok_or(StrataError::KeyNotFound)
    }

    pub fn del(&self, key: &str) {
        self.partition_for(key).del(key);
    }

    /// Number of partitions this engine was built with
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Total number of live keys across all partitions
    pub fn len(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Partition::is_empty)
    }
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}
