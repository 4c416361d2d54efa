use ::redis::AsyncCommands;
use ::redis::Client;

use crate::db::{KeyValueStore, StoreKey};
use crate::error::AppResult;

/// Creates a Redis client for the store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Redis-backed store; slots live under `<namespace>:<key>`
#[derive(Clone)]
pub struct RedisStore {
    redis_client: Client,
    namespace: String,
}

impl RedisStore {
    pub fn new(redis_client: Client, namespace: impl Into<String>) -> Self {
        Self {
            redis_client,
            namespace: namespace.into(),
        }
    }

    fn slot_key(&self, key: StoreKey) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get_raw(&self, key: StoreKey) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(self.slot_key(key)).await?;
        Ok(value)
    }

    async fn put_raw(&self, key: StoreKey, value: String) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(self.slot_key(key), value).await?;
        Ok(())
    }

    async fn delete(&self, key: StoreKey) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(self.slot_key(key)).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
