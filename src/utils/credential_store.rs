use tracing::{error, info, warn};

use super::storage::KeyValueStore;

/// Storage key of the API key entry.
pub const API_KEY_ENTRY: &str = "gemini_api_key";

type Observer = Box<dyn Fn(&str) + Send>;

/// Holds the provider API key and mirrors it to durable storage.
///
/// The key is stored in plain text. Nothing in this type sends it anywhere;
/// it only leaves the machine as a request header to the provider.
pub struct CredentialStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
    observers: Vec<Observer>,
}

impl CredentialStore {
    /// Opens the store and loads the last saved key.
    pub fn open(backend: Box<dyn KeyValueStore>) -> Self {
        let key = match backend.get(API_KEY_ENTRY) {
            Ok(Some(key)) => key,
            Ok(None) => String::new(),
            Err(e) => {
                warn!("Failed to load saved API key, starting without one: {:#}", e);
                String::new()
            }
        };

        Self {
            backend,
            key,
            observers: Vec::new(),
        }
    }

    /// Last saved key, or an empty string.
    pub fn get(&self) -> &str {
        &self.key
    }

    pub fn is_configured(&self) -> bool {
        !self.key.is_empty()
    }

    /// Saves `key`, or erases the entry when it is blank.
    pub fn set(&mut self, key: &str) {
        let key = key.trim();

        let result = if key.is_empty() {
            self.backend.remove(API_KEY_ENTRY)
        } else {
            self.backend.set(API_KEY_ENTRY, key)
        };

        match result {
            Ok(()) if key.is_empty() => info!("API key cleared"),
            Ok(()) => info!("API key saved"),
            // The key stays usable for this session even if it could not be persisted.
            Err(e) => error!("Failed to persist API key: {:#}", e),
        }

        self.key = key.to_string();
        for observer in &self.observers {
            observer(&self.key);
        }
    }

    /// Registers a callback invoked with the new value after every `set`.
    pub fn subscribe(&mut self, observer: impl Fn(&str) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("configured", &self.is_configured())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::TomlFileStore;
    use std::sync::{Arc, Mutex};

    fn open_in(dir: &std::path::Path) -> CredentialStore {
        CredentialStore::open(Box::new(TomlFileStore::in_dir(dir)))
    }

    #[test]
    fn test_empty_when_nothing_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(dir.path());
        assert_eq!(store.get(), "");
        assert!(!store.is_configured());
    }

    #[test]
    fn test_saved_key_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        open_in(dir.path()).set("  secret-key \n");

        let reloaded = open_in(dir.path());
        assert_eq!(reloaded.get(), "secret-key");
    }

    #[test]
    fn test_blank_key_erases_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(dir.path());
        store.set("secret-key");
        store.set("   ");
        assert_eq!(store.get(), "");

        let backend = TomlFileStore::in_dir(dir.path());
        assert_eq!(backend.get(API_KEY_ENTRY).unwrap(), None);
    }

    #[test]
    fn test_observers_see_every_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(dir.path());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |key| sink.lock().unwrap().push(key.to_string()));

        store.set("one");
        store.set("");

        assert_eq!(*seen.lock().unwrap(), vec!["one".to_string(), String::new()]);
    }

    #[test]
    fn test_unreadable_storage_means_no_key() {
        let dir = tempfile::tempdir().unwrap();
        let backend = TomlFileStore::in_dir(dir.path());
        std::fs::write(backend.path(), "broken = [").unwrap();

        let store = CredentialStore::open(Box::new(backend));
        assert_eq!(store.get(), "");
    }

    #[test]
    fn test_key_saved_over_corrupt_storage_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("storage.toml"), "broken = [").unwrap();

        let mut store = open_in(dir.path());
        assert_eq!(store.get(), "");
        store.set("new-key");

        assert_eq!(open_in(dir.path()).get(), "new-key");
    }
}
