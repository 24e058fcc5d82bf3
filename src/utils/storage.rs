use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Durable string key/value storage.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Key/value pairs kept as a single TOML table on disk.
///
/// Every write replaces the whole file through a temporary sibling, so a
/// crash mid-write leaves the previous contents intact. Two processes
/// writing at the same time race and the last write wins.
pub struct TomlFileStore {
    path: PathBuf,
}

impl TomlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `storage.toml` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("storage.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    /// Current entries for a write. An unreadable file is started over so
    /// that saving keeps working.
    fn load_for_write(&self) -> BTreeMap<String, String> {
        match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("{:#}, replacing it with a fresh table", e);
                BTreeMap::new()
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create storage directory {}", parent.display())
            })?;
        }
        let content = toml::to_string(entries).context("Failed to serialize storage TOML")?;
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        debug!("Wrote {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for TomlFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load_for_write();
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match self.load() {
            Ok(mut entries) => {
                if entries.remove(key).is_some() {
                    self.save(&entries)?;
                }
                Ok(())
            }
            Err(e) => {
                warn!("{:#}, replacing it with a fresh table", e);
                self.save(&BTreeMap::new())
            }
        }
    }
}

/// Session-only store, used when no per-user directory is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TomlFileStore::in_dir(dir.path());
        store.set("gemini_api_key", "abc").unwrap();
        store.set("other", "value").unwrap();

        let reopened = TomlFileStore::in_dir(dir.path());
        assert_eq!(reopened.get("gemini_api_key").unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_remove_only_drops_named_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TomlFileStore::in_dir(dir.path());
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();

        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_missing_file_reads_empty_and_creates_dirs_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TomlFileStore::in_dir(&dir.path().join("nested").join("config"));
        assert_eq!(store.get("a").unwrap(), None);
        store.remove("a").unwrap();
        assert!(!store.path().exists());

        store.set("a", "1").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlFileStore::in_dir(dir.path());
        fs::write(store.path(), "not = [valid").unwrap();
        assert!(store.get("a").is_err());
    }

    #[test]
    fn test_set_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TomlFileStore::in_dir(dir.path());
        fs::write(store.path(), "broken = [").unwrap();

        store.set("gemini_api_key", "new-key").unwrap();

        let reopened = TomlFileStore::in_dir(dir.path());
        assert_eq!(
            reopened.get("gemini_api_key").unwrap().as_deref(),
            Some("new-key")
        );
        assert!(!dir.path().join("storage.toml.tmp").exists());
    }

    #[test]
    fn test_remove_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TomlFileStore::in_dir(dir.path());
        fs::write(store.path(), "broken = [").unwrap();

        store.remove("gemini_api_key").unwrap();
        assert_eq!(store.get("gemini_api_key").unwrap(), None);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::default();
        assert_eq!(store.get("gemini_api_key").unwrap(), None);
        store.set("gemini_api_key", "abc").unwrap();
        assert_eq!(store.get("gemini_api_key").unwrap().as_deref(), Some("abc"));
        store.remove("gemini_api_key").unwrap();
        assert_eq!(store.get("gemini_api_key").unwrap(), None);
    }
}
