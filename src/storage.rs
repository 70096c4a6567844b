// Durable key/value storage for client-side state.
//
// The CLI keeps one file per key inside a state directory (by default
// `~/.gopress`). Tests and embedders can swap in `MemoryStore`.

use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Minimal persistence interface the token store is built on.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Stores each key as a plain file named after the key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-process store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_removes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("state"));

        assert_eq!(store.get("token").unwrap(), None);
        store.set("token", "abc.def.ghi").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc.def.ghi"));
        assert!(tmp.path().join("state").join("token").is_file());

        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        // second removal is a no-op
        store.remove("token").unwrap();
    }

    #[test]
    fn memory_store_overwrites() {
        let store = MemoryStore::new();
        store.set("token", "one").unwrap();
        store.set("token", "two").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("two"));
    }
}
