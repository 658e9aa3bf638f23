#![forbid(unsafe_code)]

//! Persistent result cache keyed by algorithm identifier.
//!
//! Values are JSON-serialized point arrays. Entries are created on first
//! successful fetch, read on every later request, and never invalidated
//! within a session; eviction and params-aware keying are out of scope.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key-value store for serialized point sets.
///
/// Implementations must tolerate concurrent access from fetch task
/// threads; interior synchronization belongs to the store.
pub trait CacheStore: Send + Sync {
    /// Read the raw entry for a key, if present.
    fn read(&self, key: &str) -> Option<Vec<u8>>;

    /// Write (or replace) the entry for a key.
    fn write(&self, key: &str, value: &[u8]) -> io::Result<()>;
}

/// In-memory store; survives algorithm switches but not process exit.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn write(&self, key: &str, value: &[u8]) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Filesystem store: one `<key>.json` file per entry under a directory.
///
/// Writes go through a temporary file and a rename so a crash mid-write
/// never leaves a truncated entry behind.
#[derive(Debug)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (and create if needed) a cache directory.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory entries live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CacheStore for FileCache {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.entry_path(key)).ok()
    }

    fn write(&self, key: &str, value: &[u8]) -> io::Result<()> {
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.entry_path(key))
    }
}
