//! Checkpoint Module
//!
//! Persists a single "last processed timestamp" per logical node name
//! between runs. A caller loads the checkpoint once to decide dump vs
//! backfill, and stores a new one after the run; the stream core itself
//! never touches checkpoints.

mod memory;
mod file;

pub use memory::MemoryCheckpointStore;
pub use file::FileCheckpointStore;

use crate::error::Result;

/// Get/set of one epoch-seconds timestamp keyed by node name
pub trait CheckpointStore {
    /// Load the last stored timestamp for `node`, if any
    fn load(&self, node: &str) -> Result<Option<u64>>;

    /// Store `timestamp` as the checkpoint for `node`
    fn store(&self, node: &str, timestamp: u64) -> Result<()>;
}
