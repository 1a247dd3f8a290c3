//! `localStorage`-backed key-value store.
use footle_game::{KeyValueStore, StorageError};

/// [`KeyValueStore`] over `window.localStorage`.
///
/// Outside a browser every read is empty and every write is refused, which
/// the game layer treats as a non-persistent session.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
mod imp {
    use super::StorageError;
    use crate::dom;

    pub fn get(key: &str) -> Option<String> {
        dom::local_storage().ok()?.get_item(key).ok().flatten()
    }

    pub fn set(key: &str, value: &str) -> Result<(), StorageError> {
        let storage = dom::local_storage().map_err(|_| StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|err| StorageError::Rejected {
                key: key.to_string(),
                reason: dom::js_error_message(&err),
            })
    }

    pub fn remove(key: &str) {
        if let Ok(storage) = dom::local_storage() {
            let _ = storage.remove_item(key);
        }
    }

    pub fn keys() -> Vec<String> {
        let Ok(storage) = dom::local_storage() else {
            return Vec::new();
        };
        let len = storage.length().unwrap_or(0);
        (0..len)
            .filter_map(|idx| storage.key(idx).ok().flatten())
            .collect()
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use super::StorageError;

    pub fn get(_key: &str) -> Option<String> {
        None
    }

    pub fn set(_key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    pub fn remove(_key: &str) {}

    pub fn keys() -> Vec<String> {
        Vec::new()
    }
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Option<String> {
        imp::get(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        imp::set(key, value)
    }

    fn remove_item(&self, key: &str) {
        imp::remove(key);
    }

    fn keys(&self) -> Vec<String> {
        imp::keys()
    }
}
