// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Key-value persistence backends.
//!
//! The document is stored as one string under one key. Backends only need
//! `get` and `set`; the store decides what to do when either fails.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Minimal string key-value storage.
pub trait KeyValueStore {
    /// Read the value under `key`, `None` when it was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        // Write to a sibling file first so a crash never leaves half a record.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

/// In-memory backend for tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    values: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with one record.
    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_missing_key() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = FileKeyValueStore::new(dir.path());
        assert_eq!(store.get("tubenotes.state").unwrap(), None);
    }

    #[test]
    fn test_file_store_set_and_get() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut store = FileKeyValueStore::new(dir.path().join("nested"));

        store.set("tubenotes.state", "{\"a\":1}").unwrap();
        store.set("tubenotes.state", "{\"a\":2}").unwrap();

        assert_eq!(store.get("tubenotes.state").unwrap().as_deref(), Some("{\"a\":2}"));
        assert!(dir.path().join("nested").join("tubenotes.state.json").exists());
        assert!(!dir.path().join("nested").join("tubenotes.state.json.tmp").exists());
    }

    #[test]
    fn test_key_is_sanitized() {
        let store = FileKeyValueStore::new("/data");
        assert_eq!(store.path_for("../x/y"), PathBuf::from("/data/.._x_y.json"));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryKeyValueStore::with("k", "v");
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
        assert_eq!(store.get("other").unwrap(), None);
    }
}
