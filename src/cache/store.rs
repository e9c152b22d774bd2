//! Key-value stores for cached feed responses
//!
//! `FileStore` persists each entry as a JSON file and uses the file's
//! modification time as the entry timestamp. `MemoryStore` keeps entries in a
//! map so the fetcher can be exercised without touching disk.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

/// Storage interface the cached fetcher reads and writes through
pub trait CacheStore {
    /// Returns the stored bytes for `key`, or `None` if absent or unreadable
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Stores `bytes` under `key`, replacing any previous entry
    fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()>;

    /// Returns how long ago the entry for `key` was last written
    ///
    /// Returns `None` if there is no entry. An entry stamped in the future
    /// (clock skew) reports an age of zero.
    fn age(&self, key: &str) -> Option<Duration>;

    /// Prepares the backing storage before a lookup. Must be idempotent.
    fn ensure_ready(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Stores cache entries as files in a directory
///
/// Each entry lives at `<cache_dir>/<key>.json` and holds the raw response
/// body. There is no locking; concurrent writers to the same key race and
/// the last write wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore rooted at `cache_dir`
    ///
    /// The directory is not created until the first lookup or write.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path to the cache file for the given key
    pub fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.cache_path(key)).ok()
    }

    fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        self.ensure_dir()?;
        fs::write(self.cache_path(key), bytes)
    }

    fn age(&self, key: &str) -> Option<Duration> {
        let modified = fs::metadata(self.cache_path(key)).ok()?.modified().ok()?;
        Some(age_since(modified))
    }

    fn ensure_ready(&self) -> io::Result<()> {
        self.ensure_dir()
    }
}

/// A stored entry and when it was written
#[derive(Debug, Clone)]
struct MemoryEntry {
    bytes: Vec<u8>,
    written_at: SystemTime,
}

/// Stores cache entries in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry that appears to have been written `age` ago
    pub fn insert_with_age(&self, key: &str, bytes: &[u8], age: Duration) {
        let written_at = SystemTime::now()
            .checked_sub(age)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        self.entries().insert(
            key.to_string(),
            MemoryEntry {
                bytes: bytes.to_vec(),
                written_at,
            },
        );
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, MemoryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries().get(key).map(|entry| entry.bytes.clone())
    }

    fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        self.insert_with_age(key, bytes, Duration::ZERO);
        Ok(())
    }

    fn age(&self, key: &str) -> Option<Duration> {
        self.entries()
            .get(key)
            .map(|entry| age_since(entry.written_at))
    }
}

/// Time elapsed since `then`, clamped at zero for timestamps in the future
fn age_since(then: SystemTime) -> Duration {
    SystemTime::now().duration_since(then).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::new(temp_dir.path());
        (store, temp_dir)
    }

    #[test]
    fn test_put_creates_file_in_cache_directory() {
        let (store, temp_dir) = create_test_store();

        store
            .put("test_key", br#"{"type":"FeatureCollection"}"#)
            .expect("Put should succeed");

        let expected_path = temp_dir.path().join("test_key.json");
        assert!(expected_path.exists(), "Cache file should exist");

        let content = fs::read_to_string(&expected_path).expect("Should read file");
        assert_eq!(content, r#"{"type":"FeatureCollection"}"#);
    }

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let (store, _temp_dir) = create_test_store();

        assert!(store.get("nonexistent_key").is_none());
        assert!(store.age("nonexistent_key").is_none());
    }

    #[test]
    fn test_get_returns_bytes_verbatim() {
        let (store, _temp_dir) = create_test_store();
        let body = b"{\n  \"features\": [],\n  \"type\": \"FeatureCollection\"\n}";

        store.put("verbatim_key", body).expect("Put should succeed");

        assert_eq!(store.get("verbatim_key").as_deref(), Some(&body[..]));
    }

    #[test]
    fn test_age_of_fresh_file_is_small() {
        let (store, _temp_dir) = create_test_store();

        store.put("age_key", b"{}").expect("Put should succeed");

        let age = store.age("age_key").expect("Entry should have an age");
        assert!(age < Duration::from_secs(5), "Fresh entry age was {:?}", age);
    }

    #[test]
    fn test_age_follows_modification_time() {
        let (store, _temp_dir) = create_test_store();
        store.put("old_key", b"{}").expect("Put should succeed");

        let two_hours_ago = SystemTime::now() - Duration::from_secs(7200);
        fs::File::options()
            .write(true)
            .open(store.cache_path("old_key"))
            .expect("Should open cache file")
            .set_modified(two_hours_ago)
            .expect("Should set mtime");

        let age = store.age("old_key").expect("Entry should have an age");
        assert!(age >= Duration::from_secs(7200));
    }

    #[test]
    fn test_future_modification_time_reports_zero_age() {
        let (store, _temp_dir) = create_test_store();
        store.put("future_key", b"{}").expect("Put should succeed");

        let in_an_hour = SystemTime::now() + Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(store.cache_path("future_key"))
            .expect("Should open cache file")
            .set_modified(in_an_hour)
            .expect("Should set mtime");

        assert_eq!(store.age("future_key"), Some(Duration::ZERO));
    }

    #[test]
    fn test_put_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache").join("dir");
        let store = FileStore::new(nested_path.clone());

        store.put("nested_key", b"{}").expect("Put should succeed");

        assert!(nested_path.exists(), "Nested directory should be created");
        assert!(nested_path.join("nested_key.json").exists());
    }

    #[test]
    fn test_ensure_ready_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache_dir = temp_dir.path().join("cache");
        let store = FileStore::new(cache_dir.clone());

        store.ensure_ready().expect("First call should succeed");
        store.ensure_ready().expect("Second call should succeed");

        assert!(cache_dir.is_dir());
    }

    #[test]
    fn test_overwrite_existing_entry() {
        let (store, _temp_dir) = create_test_store();

        store.put("overwrite_key", b"first").expect("First put should succeed");
        store.put("overwrite_key", b"second").expect("Second put should succeed");

        assert_eq!(store.get("overwrite_key").as_deref(), Some(&b"second"[..]));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.put("key", b"payload").expect("Put should succeed");

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key").as_deref(), Some(&b"payload"[..]));
        assert!(store.age("key").expect("age") < Duration::from_secs(5));
    }

    #[test]
    fn test_memory_store_insert_with_age() {
        let store = MemoryStore::new();

        store.insert_with_age("stale", b"{}", Duration::from_secs(7200));

        let age = store.age("stale").expect("Entry should have an age");
        assert!(age >= Duration::from_secs(7200));
        assert!(store.get("missing").is_none());
        assert!(store.age("missing").is_none());
    }
}
