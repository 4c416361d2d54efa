use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

/// Fixed storage slots
///
/// Each record is written whole under its own key; nothing ties two slots
/// together, so related records can drift apart after a partial write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Profile,
    SavedLooks,
    Favorites,
    History,
    LooksGenerated,
    SavedLooksCount,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Profile => "GlowGuide.UserProfile",
            StoreKey::SavedLooks => "GlowGuide.SavedLooks",
            StoreKey::Favorites => "GlowGuide.FavoriteLooks",
            StoreKey::History => "GlowGuide.RecentlyViewed",
            StoreKey::LooksGenerated => "GlowGuide.LooksGenerated",
            StoreKey::SavedLooksCount => "GlowGuide.SavedLooksCount",
        }
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Backend holding serialized records as strings
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`, if any
    async fn get_raw(&self, key: StoreKey) -> AppResult<Option<String>>;

    /// Overwrites the slot for `key`
    async fn put_raw(&self, key: StoreKey, value: String) -> AppResult<()>;

    async fn delete(&self, key: StoreKey) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Loads a record, treating a missing, unreadable or corrupt slot as absent
pub async fn load_record<T: DeserializeOwned>(store: &dyn KeyValueStore, key: StoreKey) -> Option<T> {
    let raw = match store.get_raw(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, key = %key, backend = store.name(), "Store read failed, treating as absent");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, key = %key, "Corrupt record, treating as absent");
            None
        }
    }
}

/// Serializes the whole record and overwrites its slot
pub async fn save_record<T: Serialize>(
    store: &dyn KeyValueStore,
    key: StoreKey,
    value: &T,
) -> AppResult<()> {
    let json = serde_json::to_string(value)
        .map_err(|e| AppError::Storage(format!("Serialization error for {}: {}", key, e)))?;

    store.put_raw(key, json).await?;
    tracing::debug!(key = %key, backend = store.name(), "Record written");

    Ok(())
}

/// Loads an integer counter, defaulting to zero
pub async fn load_counter(store: &dyn KeyValueStore, key: StoreKey) -> u32 {
    load_record::<u32>(store, key).await.unwrap_or(0)
}

pub async fn save_counter(store: &dyn KeyValueStore, key: StoreKey, value: u32) -> AppResult<()> {
    save_record(store, key, &value).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[test]
    fn test_store_key_display() {
        assert_eq!(format!("{}", StoreKey::Profile), "GlowGuide.UserProfile");
        assert_eq!(format!("{}", StoreKey::SavedLooks), "GlowGuide.SavedLooks");
        assert_eq!(format!("{}", StoreKey::Favorites), "GlowGuide.FavoriteLooks");
        assert_eq!(format!("{}", StoreKey::History), "GlowGuide.RecentlyViewed");
        assert_eq!(
            format!("{}", StoreKey::LooksGenerated),
            "GlowGuide.LooksGenerated"
        );
        assert_eq!(
            format!("{}", StoreKey::SavedLooksCount),
            "GlowGuide.SavedLooksCount"
        );
    }

    #[tokio::test]
    async fn test_load_record_missing_is_none() {
        let store = MemoryStore::new();
        let loaded: Option<Vec<String>> = load_record(&store, StoreKey::History).await;
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn test_load_record_corrupt_is_none() {
        let store = MemoryStore::new();
        store
            .put_raw(StoreKey::Favorites, "{not json".to_string())
            .await
            .unwrap();

        let loaded: Option<Vec<String>> = load_record(&store, StoreKey::Favorites).await;
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn test_save_then_load_record() {
        let store = MemoryStore::new();
        let ids = vec!["a".to_string(), "b".to_string()];
        save_record(&store, StoreKey::Favorites, &ids).await.unwrap();

        let loaded: Option<Vec<String>> = load_record(&store, StoreKey::Favorites).await;
        assert_eq!(loaded, Some(ids));
    }

    #[tokio::test]
    async fn test_counter_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(load_counter(&store, StoreKey::LooksGenerated).await, 0);

        save_counter(&store, StoreKey::LooksGenerated, 2).await.unwrap();
        assert_eq!(load_counter(&store, StoreKey::LooksGenerated).await, 2);

        store
            .put_raw(StoreKey::LooksGenerated, "-4".to_string())
            .await
            .unwrap();
        assert_eq!(load_counter(&store, StoreKey::LooksGenerated).await, 0);
    }
}
