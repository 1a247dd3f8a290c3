//! Key-value persistence with a namespaced, daily-purgeable layout.
//!
//! Every read is total (missing or corrupt data reads as absent) and every
//! write is best-effort: failures are logged and dropped so in-memory state
//! stays authoritative for the rest of the session.
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;

use crate::constants::{
    KEY_DAILY_CHALLENGES, KEY_LAST_DATE, KEY_PROGRESS, KEY_SEPARATOR, KEY_SESSION_SUFFIX,
};
use crate::footballer::GameMode;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage medium unavailable")]
    Unavailable,
    #[error("write rejected for '{key}': {reason}")]
    Rejected { key: String, reason: String },
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Raw string storage, shaped after the browser `Storage` API.
///
/// Platform-specific implementations should provide this.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium is unavailable or refuses the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str);

    /// Snapshot of every key currently stored.
    fn keys(&self) -> Vec<String>;
}

/// In-memory store. Clones share the same map, so a test can keep a handle
/// while a session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    refuse_writes: Rc<Cell<bool>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail as if the quota were exhausted.
    pub fn set_refuse_writes(&self, refuse: bool) {
        self.refuse_writes.set(refuse);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.refuse_writes.get() {
            return Err(StorageError::Rejected {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

/// Key layout under the application prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches(KEY_SEPARATOR).to_string(),
        }
    }

    fn join(&self, suffix: &str) -> String {
        format!("{}{KEY_SEPARATOR}{suffix}", self.prefix)
    }

    /// Last seen UTC day. Never purged.
    #[must_use]
    pub fn last_date(&self) -> String {
        self.join(KEY_LAST_DATE)
    }

    #[must_use]
    pub fn daily_challenges(&self) -> String {
        self.join(KEY_DAILY_CHALLENGES)
    }

    #[must_use]
    pub fn progress(&self) -> String {
        self.join(KEY_PROGRESS)
    }

    #[must_use]
    pub fn session(&self, mode: GameMode) -> String {
        self.join(&format!("{}{KEY_SEPARATOR}{KEY_SESSION_SUFFIX}", mode.key()))
    }

    /// Prefixes whose keys are dropped on a new day. Preference keys stay
    /// outside these namespaces.
    #[must_use]
    pub fn purgeable_prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = GameMode::ALL
            .into_iter()
            .map(|mode| self.join(mode.key()))
            .collect();
        prefixes.push(self.progress());
        prefixes.push(self.daily_challenges());
        prefixes
    }

    #[must_use]
    pub fn is_purgeable(&self, key: &str) -> bool {
        self.purgeable_prefixes()
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()))
    }

    /// Whether `key` belongs to this application at all.
    #[must_use]
    pub fn is_owned(&self, key: &str) -> bool {
        key.strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.starts_with(KEY_SEPARATOR))
    }
}

/// Typed JSON access over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct GameStore<S> {
    store: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> GameStore<S> {
    #[must_use]
    pub fn new(store: S, prefix: &str) -> Self {
        Self {
            store,
            keys: StorageKeys::new(prefix),
        }
    }

    #[must_use]
    pub const fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Decode the JSON stored under `key`; absent on missing or malformed data.
    #[must_use]
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get_item(key)?;
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("discarding unreadable entry '{key}': {err}");
                None
            }
        }
    }

    /// Encode and store `value`. Failures are logged and otherwise ignored.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_write(key, value) {
            log::warn!("dropping write to '{key}': {err}");
        }
    }

    /// Encode and store `value`, reporting failure.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the medium rejects the write.
    pub fn try_write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.store.set_item(key, &raw)
    }

    pub fn remove(&self, key: &str) {
        self.store.remove_item(key);
    }

    /// Remove every key under the daily-purgeable prefixes. Returns how many
    /// entries were removed.
    pub fn purge_daily(&self) -> usize {
        let doomed: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|key| self.keys.is_purgeable(key))
            .collect();
        for key in &doomed {
            self.store.remove_item(key);
        }
        doomed.len()
    }

    /// Remove every key owned by the application, marker and preferences
    /// included.
    pub fn clear_all(&self) -> usize {
        let doomed: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|key| self.keys.is_owned(key))
            .collect();
        for key in &doomed {
            self.store.remove_item(key);
        }
        doomed.len()
    }

    /// Last seen day stamp, stored as a raw string outside the purge set.
    #[must_use]
    pub fn last_date(&self) -> Option<String> {
        self.store
            .get_item(&self.keys.last_date())
            .filter(|stamp| !stamp.is_empty())
    }

    pub fn set_last_date(&self, stamp: &str) {
        if let Err(err) = self.store.set_item(&self.keys.last_date(), stamp) {
            log::warn!("could not record last seen day {stamp}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (MemoryStore, GameStore<MemoryStore>) {
        let raw = MemoryStore::new();
        (raw.clone(), GameStore::new(raw, "footle"))
    }

    #[test]
    fn key_layout_matches_namespace() {
        let keys = StorageKeys::new("footle");
        assert_eq!(keys.last_date(), "footle:lastDate");
        assert_eq!(keys.daily_challenges(), "footle:dailyChallenges");
        assert_eq!(keys.progress(), "footle:progress");
        assert_eq!(keys.session(GameMode::Silhouette), "footle:silhouette:session");
        assert!(keys.is_purgeable("footle:emoji:session"));
        assert!(!keys.is_purgeable("footle:lastDate"));
        assert!(!keys.is_purgeable("footle:prefs:theme"));
        assert!(keys.is_owned("footle:prefs:theme"));
        assert!(!keys.is_owned("footleother:x"));
    }

    #[test]
    fn read_treats_corrupt_and_missing_as_absent() {
        let (raw, store) = store();
        raw.set_item("footle:progress", "{not json").unwrap();
        assert_eq!(store.read::<Vec<u32>>("footle:progress"), None);
        assert_eq!(store.read::<Vec<u32>>("footle:missing"), None);
        raw.set_item("footle:empty", "").unwrap();
        assert_eq!(store.read::<Vec<u32>>("footle:empty"), None);

        store.write("footle:ids", &vec![1_u32, 2, 3]);
        assert_eq!(store.read::<Vec<u32>>("footle:ids"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn refused_writes_are_silent() {
        let (raw, store) = store();
        raw.set_refuse_writes(true);
        store.write("footle:progress", &42_u32);
        store.set_last_date("2025-01-01");
        assert!(raw.is_empty());
        assert!(store.try_write("footle:progress", &42_u32).is_err());
    }

    #[test]
    fn purge_keeps_marker_and_preferences() {
        let (raw, store) = store();
        for key in [
            "footle:classic:session",
            "footle:pixel:session",
            "footle:progress",
            "footle:dailyChallenges",
            "footle:prefs:theme",
            "other:app",
        ] {
            raw.set_item(key, "1").unwrap();
        }
        store.set_last_date("2025-02-02");

        assert_eq!(store.purge_daily(), 4);
        assert_eq!(
            raw.keys(),
            vec!["footle:lastDate", "footle:prefs:theme", "other:app"]
        );

        assert_eq!(store.clear_all(), 2);
        assert_eq!(raw.keys(), vec!["other:app"]);
    }
}
