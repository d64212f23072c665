//! Durable key/value storage for the bearer token and cached user record.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser client backs this with `localStorage`, the CLI with a JSON
//! file, tests with `MemoryStorage`. The session store only ever touches the
//! two keys below, and always through `StoredSession` so they stay paired.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::types::User;

/// Storage key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Storage key holding the JSON-serialized `User`.
pub const USER_KEY: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("storage write rejected: {0}")]
    Rejected(String),
}

/// Minimal string key/value persistence.
pub trait SessionStorage {
    /// Read `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: SessionStorage + ?Sized> SessionStorage for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

// =============================================================================
// StoredSession
// =============================================================================

/// The persisted `{auth_token, user}` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredSession {
    pub auth_token: String,
    pub user: User,
}

impl StoredSession {
    /// Load the pair. A half-present or unparseable pair is cleared and
    /// reported as absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend itself fails.
    pub fn load<S: SessionStorage + ?Sized>(storage: &S) -> Result<Option<Self>, StorageError> {
        let token = storage.get(AUTH_TOKEN_KEY)?.filter(|t| !t.is_empty());
        let raw_user = storage.get(USER_KEY)?;

        match (token, raw_user) {
            (None, None) => Ok(None),
            (Some(auth_token), Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Ok(Some(Self { auth_token, user })),
                Err(e) => {
                    tracing::warn!(error = %e, "stored user record unreadable; clearing session");
                    Self::clear(storage)?;
                    Ok(None)
                }
            },
            _ => {
                tracing::warn!("stored session half-present; clearing");
                Self::clear(storage)?;
                Ok(None)
            }
        }
    }

    /// Persist both keys.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if either write fails; a failed user write
    /// removes the token again so the pair never ends up half-written.
    pub fn save<S: SessionStorage + ?Sized>(&self, storage: &S) -> Result<(), StorageError> {
        let raw_user = serde_json::to_string(&self.user)?;
        storage.set(AUTH_TOKEN_KEY, &self.auth_token)?;
        if let Err(e) = storage.set(USER_KEY, &raw_user) {
            if let Err(rollback) = storage.remove(AUTH_TOKEN_KEY) {
                tracing::warn!(error = %rollback, "failed to roll back token after user write failed");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove both keys.
    ///
    /// # Errors
    ///
    /// Returns the first backend failure; both removals are always attempted.
    pub fn clear<S: SessionStorage + ?Sized>(storage: &S) -> Result<(), StorageError> {
        let token = storage.remove(AUTH_TOKEN_KEY);
        let user = storage.remove(USER_KEY);
        token.and(user)
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage. Clones share the same map, which lets a test build a
/// second store over the "same disk" to simulate a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// JSON-object file on disk. Each write rewrites the file via a sibling
/// temp file and rename.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if map.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.read_map()?;
        map.insert(key.to_owned(), value.to_owned());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.read_map()?;
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.write_map(&map)
    }
}
