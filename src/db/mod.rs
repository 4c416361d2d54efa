pub mod file;
pub mod memory;
pub mod redis;
pub mod store;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;
pub use self::redis::{create_redis_client, RedisStore};
pub use self::store::{load_counter, load_record, save_counter, save_record, KeyValueStore, StoreKey};
