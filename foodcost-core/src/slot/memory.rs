use std::sync::{Arc, Mutex, MutexGuard};

use super::{SlotError, SnapshotSlot, SNAPSHOT_KEY};

/// In-process slot. Clones share the same cell.
///
/// Handy for tests and for simulating a full storage quota.
#[derive(Debug, Clone)]
pub struct MemorySlot {
    key: String,
    cell: Arc<Mutex<Option<String>>>,
    quota: Option<usize>,
}

impl Default for MemorySlot {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySlot {
    /// Creates an empty slot under the demo snapshot key.
    pub fn new() -> Self {
        Self {
            key: SNAPSHOT_KEY.to_string(),
            cell: Arc::new(Mutex::new(None)),
            quota: None,
        }
    }

    /// Writes larger than `bytes` fail with [`SlotError::QuotaExceeded`].
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Current contents without going through the trait.
    pub fn contents(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        // The cell holds a plain string; a poisoned lock still has valid data.
        self.cell.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotSlot for MemorySlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Option<String>, SlotError> {
        Ok(self.lock().clone())
    }

    fn write(&self, contents: &str) -> Result<(), SlotError> {
        if let Some(limit) = self.quota {
            if contents.len() > limit {
                return Err(SlotError::QuotaExceeded {
                    size: contents.len(),
                    limit,
                });
            }
        }
        *self.lock() = Some(contents.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SlotError> {
        *self.lock() = None;
        Ok(())
    }
}
