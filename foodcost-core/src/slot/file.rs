use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{validate_key, SlotError, SnapshotSlot, SNAPSHOT_KEY};

/// A slot stored as `<data_dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSlot {
    data_dir: PathBuf,
    key: String,
}

impl FileSlot {
    /// Creates a slot with a custom key inside `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>, key: impl Into<String>) -> Result<Self, SlotError> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self {
            data_dir: data_dir.into(),
            key,
        })
    }

    /// Creates the demo snapshot slot inside `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            key: SNAPSHOT_KEY.to_string(),
        }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path of the slot file.
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.key))
    }

    /// Checks if the slot file exists on disk.
    pub fn exists(&self) -> bool {
        self.path().exists()
    }
}

impl SnapshotSlot for FileSlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Option<String>, SlotError> {
        let path = self.path();
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SlotError::Io { path, source }),
        }
    }

    fn write(&self, contents: &str) -> Result<(), SlotError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| SlotError::Io {
            path: self.data_dir.clone(),
            source,
        })?;

        let path = self.path();
        let temp_path = path.with_extension("json.tmp");

        let mut file = File::create(&temp_path).map_err(|source| SlotError::Io {
            path: temp_path.clone(),
            source,
        })?;
        file.write_all(contents.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|source| SlotError::Io {
                path: temp_path.clone(),
                source,
            })?;

        // Rename is atomic on most filesystems
        fs::rename(&temp_path, &path).map_err(|source| SlotError::Io { path, source })
    }

    fn clear(&self) -> Result<(), SlotError> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SlotError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_slot() -> (FileSlot, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileSlot::in_dir(temp_dir.path());
        (slot, temp_dir)
    }

    #[test]
    fn test_slot_path() {
        let (slot, _temp) = test_slot();
        assert!(slot.path().ends_with("foodcost-demo-state.json"));
    }

    #[test]
    fn test_new_rejects_path_keys() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileSlot::new(temp_dir.path(), "../escape");
        assert!(matches!(result, Err(SlotError::InvalidKey(_))));
    }

    #[test]
    fn test_read_nonexistent_returns_none() {
        let (slot, _temp) = test_slot();
        assert!(slot.read().unwrap().is_none());
        assert!(!slot.exists());
    }

    #[test]
    fn test_write_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested_dir = temp_dir.path().join("nested").join("data");
        let slot = FileSlot::in_dir(nested_dir.clone());

        slot.write("{}").unwrap();

        assert!(nested_dir.exists());
        assert!(slot.exists());
    }

    #[test]
    fn test_write_and_read_roundtrip() {
        let (slot, _temp) = test_slot();

        slot.write(r#"{"users": []}"#).unwrap();

        assert_eq!(slot.read().unwrap().as_deref(), Some(r#"{"users": []}"#));
    }

    #[test]
    fn test_overwrite_leaves_no_temp_file() {
        let (slot, temp) = test_slot();

        slot.write("1").unwrap();
        slot.write("2").unwrap();

        assert_eq!(slot.read().unwrap().as_deref(), Some("2"));
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_clear() {
        let (slot, _temp) = test_slot();

        slot.write("data").unwrap();
        slot.clear().unwrap();
        assert!(slot.read().unwrap().is_none());

        // Clearing again is fine
        slot.clear().unwrap();
    }

    #[test]
    fn test_keys_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let first = FileSlot::new(temp_dir.path(), "first").unwrap();
        let second = FileSlot::new(temp_dir.path(), "second").unwrap();

        first.write("a").unwrap();

        assert_eq!(first.read().unwrap().as_deref(), Some("a"));
        assert!(second.read().unwrap().is_none());
    }
}
