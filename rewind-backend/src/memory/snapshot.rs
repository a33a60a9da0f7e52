use rewind_core::CacheEntry;
use serde::{Deserialize, Serialize};

use super::MemoryBackend;
use crate::SnapshotError;

/// Serializable copy of a store's entries, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Recorded exchanges.
    pub cached_requests: Vec<CacheEntry>,
}

impl MemoryBackend {
    /// Copies the current entries.
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            cached_requests: self
                .entries()
                .iter()
                .map(|entry| CacheEntry::clone(entry))
                .collect(),
        }
    }

    /// Serializes the current entries as JSON.
    ///
    /// Fails if a recorded header value is not valid UTF-8.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Creates a replaying, raw-matching store seeded from JSON produced by
    /// [`MemoryBackend::to_json`].
    ///
    /// Use [`MemoryBackend::builder`] with
    /// [`snapshot`](super::MemoryBackendBuilder::snapshot) for other settings.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: MemorySnapshot = serde_json::from_str(json)?;
        Ok(Self::builder().snapshot(snapshot).build())
    }
}
