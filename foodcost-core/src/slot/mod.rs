//! Persistent slots: a single named string entry that mirrors the store.
//!
//! The store writes its full JSON snapshot to one slot on every mutation and
//! reads it once at startup.
//!
//! - [`FileSlot`]: `<data_dir>/<key>.json` on disk, written atomically.
//! - [`MemorySlot`]: shared in-process cell with an optional byte quota.

mod file;
mod memory;

pub use file::FileSlot;
pub use memory::MemorySlot;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Key under which the demo snapshot is stored.
pub const SNAPSHOT_KEY: &str = "foodcost-demo-state";

/// A single string-keyed entry in local durable storage.
pub trait SnapshotSlot {
    /// Returns the slot's key.
    fn key(&self) -> &str;

    /// Reads the slot.
    ///
    /// Returns `Ok(None)` if nothing has been written yet.
    fn read(&self) -> Result<Option<String>, SlotError>;

    /// Replaces the slot's contents.
    fn write(&self, contents: &str) -> Result<(), SlotError>;

    /// Removes the slot. Clearing an empty slot is not an error.
    fn clear(&self) -> Result<(), SlotError>;
}

impl<S: SnapshotSlot + ?Sized> SnapshotSlot for Box<S> {
    fn key(&self) -> &str {
        (**self).key()
    }

    fn read(&self) -> Result<Option<String>, SlotError> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> Result<(), SlotError> {
        (**self).write(contents)
    }

    fn clear(&self) -> Result<(), SlotError> {
        (**self).clear()
    }
}

/// Errors that can occur reading or writing a slot.
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid slot key: {0}")]
    InvalidKey(String),

    #[error("I/O error for {}: {}", .path.display(), .source)]
    Io { path: PathBuf, source: io::Error },

    #[error("Snapshot of {size} bytes exceeds the slot quota of {limit} bytes")]
    QuotaExceeded { size: usize, limit: usize },
}

/// Rejects keys that would escape the slot's directory.
pub(crate) fn validate_key(key: &str) -> Result<(), SlotError> {
    if key.is_empty()
        || key.contains('/')
        || key.contains('\\')
        || key.contains("..")
        || key.starts_with('.')
    {
        return Err(SlotError::InvalidKey(key.to_string()));
    }
    Ok(())
}
