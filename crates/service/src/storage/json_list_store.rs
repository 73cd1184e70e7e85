use std::{marker::PhantomData, path::PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;

use crate::errors::ServiceError;

/// Generic JSON file-backed ordered list.
///
/// The whole list is one pretty-printed JSON array. Element order on disk is
/// the order of the slice passed to [`JsonListStore::save`]. Nothing is cached
/// between calls; every `load` reads the file again.
pub struct JsonListStore<T> {
    file_path: PathBuf,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonListStore<T> {
    fn clone(&self) -> Self {
        Self { file_path: self.file_path.clone(), _item: PhantomData }
    }
}

impl<T> JsonListStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind the store to a path. The file is not touched until the first save.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _item: PhantomData }
    }

    /// Read every element. A missing file is an empty list; any other read
    /// failure, or content that is not a JSON array of `T`, is an error.
    pub async fn load(&self) -> Result<Vec<T>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ServiceError::io(self.file_path.display(), e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::Serialization(e.to_string()))
    }

    /// Replace the file content with `items`, creating parent directories.
    pub async fn save(&self, items: &[T]) -> Result<(), ServiceError> {
        common::env::ensure_parent_dir(&self.file_path)
            .await
            .map_err(|e| ServiceError::Io(e.to_string()))?;
        // serde_json's pretty printer indents by two spaces and leaves
        // non-ASCII characters unescaped.
        let data = serde_json::to_vec_pretty(items).map_err(|e| ServiceError::Serialization(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::io(self.file_path.display(), e))?;
        Ok(())
    }
}
