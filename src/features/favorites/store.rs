use parking_lot::Mutex;
use std::sync::Arc;

use crate::data::models::{FavoriteEntry, PromptRecord, StoreError};
use crate::data::repositories::KeyValueStore;

pub const FAVORITES_KEY: &str = "favorites";

/// Favorite prompt snapshots, persisted as one JSON array.
pub struct FavoritesStore {
    kv: Arc<dyn KeyValueStore>,
    entries: Mutex<Vec<FavoriteEntry>>,
}

impl FavoritesStore {
    /// Loads the persisted list; unreadable or corrupt data starts empty.
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let entries = match kv.get(FAVORITES_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<FavoriteEntry>>(&raw).unwrap_or_else(|e| {
                log::warn!("Discarding corrupt favorites data: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read favorites: {}", e);
                Vec::new()
            }
        };

        FavoritesStore {
            kv,
            entries: Mutex::new(entries),
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.entries.lock().iter().any(|f| f.id == id)
    }

    pub fn all(&self) -> Vec<FavoriteEntry> {
        self.entries.lock().clone()
    }

    /// Flips membership of `record`, returning the new state.
    pub fn toggle(&self, record: &PromptRecord) -> Result<bool, StoreError> {
        self.mutate(|entries| {
            match entries.iter().position(|f| f.id == record.id) {
                Some(pos) => {
                    entries.remove(pos);
                    false
                }
                None => {
                    entries.push(FavoriteEntry::from(record));
                    true
                }
            }
        })
        .map(|(_, state)| state)
    }

    /// Returns whether the set changed.
    pub fn add(&self, record: &PromptRecord) -> Result<bool, StoreError> {
        self.mutate(|entries| {
            if entries.iter().any(|f| f.id == record.id) {
                return;
            }
            entries.push(FavoriteEntry::from(record));
        })
        .map(|(changed, _)| changed)
    }

    /// Returns whether the set changed.
    pub fn remove(&self, id: &str) -> Result<bool, StoreError> {
        self.mutate(|entries| {
            let before = entries.len();
            entries.retain(|f| f.id != id);
            entries.len() != before
        })
        .map(|(changed, _)| changed)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.mutate(|entries| entries.clear()).map(|_| ())
    }

    /// Applies `change` and persists the list under the same lock. A failed
    /// write restores the previous list.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Vec<FavoriteEntry>) -> T,
    ) -> Result<(bool, T), StoreError> {
        let mut entries = self.entries.lock();
        let previous = entries.clone();
        let out = change(&mut *entries);

        if *entries == previous {
            return Ok((false, out));
        }

        let persisted = serde_json::to_string(&*entries)
            .map_err(StoreError::from)
            .and_then(|json| self.kv.set(FAVORITES_KEY, &json));

        match persisted {
            Ok(()) => Ok((true, out)),
            Err(e) => {
                log::error!("Failed to persist favorites: {}", e);
                *entries = previous;
                Err(e)
            }
        }
    }
}
