//! Browser `localStorage` backend for the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Holds the `auth_token` / `user` pair across page reloads. The pair
//! invariant itself is enforced by `eyeclinic::storage::StoredSession`;
//! this type only moves strings.

use eyeclinic::storage::{SessionStorage, StorageError};

/// `window.localStorage`. Outside a browser every call reports
/// `StorageError::Unavailable`, which the store treats as "no session".
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl SessionStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?.get_item(key).map_err(rejected)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?.set_item(key, value).map_err(rejected)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?.remove_item(key).map_err(rejected)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }
}

#[cfg(feature = "csr")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

/// Quota and privacy-mode failures surface as a JS exception.
#[cfg(feature = "csr")]
fn rejected(err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Rejected(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
