//! File-backed checkpoint store
//!
//! One `<node>.ckpt` file per node under a directory. Record layout:
//!
//! ```text
//! ┌────────────┬──────────────────────────┐
//! │ crc32 (4)  │ bincode payload          │
//! └────────────┴──────────────────────────┘
//! ```
//!
//! The CRC covers the payload, so a torn or corrupted write is detected
//! on load instead of silently resetting the stream position. Writes go
//! to a temp file first and are renamed into place.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TapError};
use super::CheckpointStore;

/// On-disk checkpoint record
#[derive(Debug, Serialize, Deserialize)]
struct CheckpointRecord {
    node: String,
    timestamp: u64,
}

/// Checkpoint store persisting one file per node
pub struct FileCheckpointStore {
    dir: PathBuf,
}

impl FileCheckpointStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, node: &str) -> PathBuf {
        self.dir.join(format!("{}.ckpt", node))
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn load(&self, node: &str) -> Result<Option<u64>> {
        let path = self.path_for(node);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if bytes.len() < 4 {
            return Err(TapError::Serialization(format!(
                "checkpoint {} is truncated ({} bytes)",
                path.display(),
                bytes.len()
            )));
        }

        let stored_crc = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let payload = &bytes[4..];
        if crc32fast::hash(payload) != stored_crc {
            return Err(TapError::Serialization(format!(
                "checkpoint {} failed CRC validation",
                path.display()
            )));
        }

        let record: CheckpointRecord = bincode::deserialize(payload).map_err(|e| {
            TapError::Serialization(format!("checkpoint {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            "loaded checkpoint for {:?}: timestamp {}",
            node,
            record.timestamp
        );
        Ok(Some(record.timestamp))
    }

    fn store(&self, node: &str, timestamp: u64) -> Result<()> {
        let record = CheckpointRecord {
            node: node.to_string(),
            timestamp,
        };
        let payload = bincode::serialize(&record)
            .map_err(|e| TapError::Serialization(format!("checkpoint for {:?}: {}", node, e)))?;

        let mut bytes = Vec::with_capacity(4 + payload.len());
        bytes.extend_from_slice(&crc32fast::hash(&payload).to_be_bytes());
        bytes.extend_from_slice(&payload);

        let path = self.path_for(node);
        let tmp = path.with_extension("ckpt.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!("stored checkpoint for {:?}: timestamp {}", node, timestamp);
        Ok(())
    }
}
