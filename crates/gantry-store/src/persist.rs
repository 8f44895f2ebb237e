//! JSON snapshot persistence.
//!
//! A [`SnapshotFile`] is one named JSON document under a state
//! directory. Loading tolerates an absent or unreadable file by
//! returning the default value; stores snapshot after each mutation and
//! log-and-continue on save failure.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// A named JSON snapshot under a state directory.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Creates a snapshot handle for `<state_dir>/<name>.json`.
    #[must_use]
    pub fn new(state_dir: &Path, name: &str) -> Self {
        Self {
            path: state_dir.join(format!("{name}.json")),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the snapshot, returning the default value if the file is
    /// absent or does not parse.
    #[must_use]
    pub fn load<T: DeserializeOwned + Default>(&self) -> T {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read snapshot");
                return T::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to parse snapshot");
                T::default()
            }
        }
    }

    /// Writes the snapshot, creating the state directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the filesystem write fails.
    pub fn save<T: Serialize>(&self, value: &T) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotFile::new(dir.path(), "nothing");

        let map: HashMap<String, i32> = store.load();
        assert!(map.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotFile::new(dir.path(), "counts");

        let mut map = HashMap::new();
        map.insert("app-1".to_string(), 4);
        store.save(&map).expect("save");

        let loaded: HashMap<String, i32> = store.load();
        assert_eq!(loaded, map);
    }

    #[test]
    fn corrupt_file_returns_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotFile::new(dir.path(), "corrupt");
        fs::write(store.path(), b"not json").expect("write");

        let map: HashMap<String, i32> = store.load();
        assert!(map.is_empty());
    }

    #[test]
    fn save_creates_state_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("deep").join("state");
        let store = SnapshotFile::new(&nested, "counts");

        let mut map = HashMap::new();
        map.insert("app-1".to_string(), 1);
        store.save(&map).expect("save");

        assert!(store.path().exists());
    }
}
