use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::db::{KeyValueStore, StoreKey};
use crate::error::AppResult;

/// Process-local store, used for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_raw(&self, key: StoreKey) -> AppResult<Option<String>> {
        Ok(self.slots.read().await.get(&key).cloned())
    }

    async fn put_raw(&self, key: StoreKey, value: String) -> AppResult<()> {
        self.slots.write().await.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: StoreKey) -> AppResult<()> {
        self.slots.write().await.remove(&key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
