//! In-memory checkpoint store

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;
use super::CheckpointStore;

/// Checkpoint store backed by a process-local map
///
/// Useful for tests and for callers that manage persistence themselves.
#[derive(Default)]
pub struct MemoryCheckpointStore {
    entries: RwLock<HashMap<String, u64>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn load(&self, node: &str) -> Result<Option<u64>> {
        Ok(self.entries.read().get(node).copied())
    }

    fn store(&self, node: &str, timestamp: u64) -> Result<()> {
        self.entries.write().insert(node.to_string(), timestamp);
        Ok(())
    }
}
