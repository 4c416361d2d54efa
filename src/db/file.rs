use std::path::{Path, PathBuf};
use tokio::fs;

use crate::db::{KeyValueStore, StoreKey};
use crate::error::AppResult;

/// Stores each slot as `<dir>/<key>.json`
///
/// Writes go to a temporary sibling and are renamed into place.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) the storage directory
    pub async fn open(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;

        tracing::info!(path = %dir.display(), "File store opened");

        Ok(Self { dir })
    }

    fn slot_path(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileStore {
    async fn get_raw(&self, key: StoreKey) -> AppResult<Option<String>> {
        match fs::read_to_string(self.slot_path(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_raw(&self, key: StoreKey, value: String) -> AppResult<()> {
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;

        Ok(())
    }

    async fn delete(&self, key: StoreKey) -> AppResult<()> {
        match fs::remove_file(self.slot_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
