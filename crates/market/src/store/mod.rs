//! Key-value persistence adapter.
//!
//! Collections are stored whole, one JSON value per key. [`Storage`] is the
//! adapter every service goes through: reads fall back to a caller-supplied
//! default and writes never fail visibly. Backend and serialization failures
//! are logged and swallowed here, so callers cannot tell an empty collection
//! from an unavailable store.
//!
//! There is no locking. Services read a collection, modify it in memory, and
//! write it back, which is only safe with a single writer at a time.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys for marketplace data.
pub mod keys {
    /// Array of users.
    pub const USERS: &str = "marketplace_users";

    /// Array of product listings.
    pub const PRODUCTS: &str = "marketplace_products";

    /// Array of cart items for all users.
    pub const CART: &str = "marketplace_cart";

    /// Array of purchase records.
    pub const PURCHASES: &str = "marketplace_purchases";

    /// Session projection of the signed-in user.
    pub const CURRENT_USER: &str = "marketplace_current_user";

    /// Opaque token paired with the session projection.
    pub const AUTH_TOKEN: &str = "marketplace_auth_token";
}

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key contains characters the backend cannot store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string key-value backend.
///
/// Methods take `&self`; implementations use interior mutability.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Retrieve a value. Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or replace a value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value. Succeeds even if the key did not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend rejects the removal.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Notification that a key was changed by another writer sharing the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Changed key, or `None` when the whole store was cleared.
    pub key: Option<String>,
}

impl StorageEvent {
    /// A single key changed.
    #[must_use]
    pub fn changed(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    /// Every key was cleared.
    #[must_use]
    pub const fn cleared() -> Self {
        Self { key: None }
    }

    /// Whether this event affects `key`.
    #[must_use]
    pub fn affects(&self, key: &str) -> bool {
        self.key.as_deref().is_none_or(|changed| changed == key)
    }
}

/// Cheaply cloneable handle to the persistence backend.
///
/// A detached storage has no backend at all: reads return defaults and
/// writes are dropped.
#[derive(Clone, Debug)]
pub struct Storage {
    backend: Option<Arc<dyn KeyValueStore>>,
}

impl Storage {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Some(Arc::new(backend)),
        }
    }

    /// Storage over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Storage with no backend.
    #[must_use]
    pub const fn detached() -> Self {
        Self { backend: None }
    }

    /// Whether a backend is attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.backend.is_some()
    }

    /// Read and decode the value under `key`.
    ///
    /// Returns `default` when the key is absent, the value does not decode,
    /// the backend fails, or no backend is attached.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(backend) = &self.backend else {
            tracing::warn!(key, "No storage backend attached, using default");
            return default;
        };

        let raw = match backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read from storage");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored value is corrupt, using default");
                default
            }
        }
    }

    /// Encode and store `value` under `key`. Failures are logged, not returned.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let Some(backend) = &self.backend else {
            tracing::warn!(key, "No storage backend attached, dropping write");
            return;
        };

        let result = serde_json::to_string(value)
            .map_err(StoreError::from)
            .and_then(|raw| backend.set(key, &raw));

        if let Err(e) = result {
            tracing::warn!(key, error = %e, "Failed to write to storage");
        }
    }

    /// Remove `key`. Failures are logged, not returned.
    pub fn remove(&self, key: &str) {
        let Some(backend) = &self.backend else {
            return;
        };

        if let Err(e) = backend.remove(key) {
            tracing::warn!(key, error = %e, "Failed to remove from storage");
        }
    }

    /// Whether `key` currently holds a value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.backend
            .as_ref()
            .is_some_and(|backend| matches!(backend.get(key), Ok(Some(_))))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk on fire")))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("quota exceeded")))
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("read-only")))
        }
    }

    #[test]
    fn test_read_missing_returns_default() {
        let storage = Storage::in_memory();
        let value: Vec<u32> = storage.read("missing", vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn test_write_then_read() {
        let storage = Storage::in_memory();
        storage.write("numbers", &vec![1, 2, 3]);
        let value: Vec<u32> = storage.read("numbers", Vec::new());
        assert_eq!(value, vec![1, 2, 3]);
        assert!(storage.contains("numbers"));
    }

    #[test]
    fn test_read_corrupt_returns_default() {
        let backend = MemoryStore::new();
        backend.set("numbers", "{not json").unwrap();
        let storage = Storage::new(backend);

        let value: Vec<u32> = storage.read("numbers", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_read_wrong_shape_returns_default() {
        let storage = Storage::in_memory();
        storage.write("numbers", "a string");
        let value: Vec<u32> = storage.read("numbers", vec![9]);
        assert_eq!(value, vec![9]);
    }

    #[test]
    fn test_broken_backend_never_fails_visibly() {
        let storage = Storage::new(BrokenStore);
        storage.write("numbers", &vec![1]);
        storage.remove("numbers");
        let value: Vec<u32> = storage.read("numbers", Vec::new());
        assert!(value.is_empty());
        assert!(!storage.contains("numbers"));
    }

    #[test]
    fn test_detached_storage() {
        let storage = Storage::detached();
        assert!(!storage.is_attached());
        storage.write("numbers", &vec![1]);
        let value: Vec<u32> = storage.read("numbers", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_remove() {
        let storage = Storage::in_memory();
        storage.write(keys::AUTH_TOKEN, "token");
        storage.remove(keys::AUTH_TOKEN);
        assert!(!storage.contains(keys::AUTH_TOKEN));
        // Removing again is fine
        storage.remove(keys::AUTH_TOKEN);
    }

    #[test]
    fn test_clones_share_backend() {
        let storage = Storage::in_memory();
        let other = storage.clone();
        storage.write("shared", &true);
        assert!(other.read("shared", false));
    }

    #[test]
    fn test_storage_event_affects() {
        assert!(StorageEvent::changed(keys::AUTH_TOKEN).affects(keys::AUTH_TOKEN));
        assert!(!StorageEvent::changed(keys::CART).affects(keys::AUTH_TOKEN));
        assert!(StorageEvent::cleared().affects(keys::CURRENT_USER));
    }
}
