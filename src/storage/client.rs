use async_trait::async_trait;

use crate::error::AppError;

/// Trait for attachment blob storage.
///
/// Abstracted as a trait so tests and alternative backends can stand in for
/// the filesystem store.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Upload content to the given key.
    async fn put_object(&self, key: &str, content: Vec<u8>) -> Result<(), AppError>;

    /// Retrieve content by key. Returns `None` if the object doesn't exist.
    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;
}

/// Keys are generated server-side; anything that could escape the storage
/// directory is refused.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 128
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Stores each object as a file under one directory.
///
/// Only available when the `ssr` feature is enabled.
#[cfg(feature = "ssr")]
pub struct FsStorageClient {
    root: std::path::PathBuf,
}

#[cfg(feature = "ssr")]
impl FsStorageClient {
    /// Create the store, creating `root` if needed.
    pub async fn new(root: impl Into<std::path::PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Storage(format!("Failed to create '{}': {}", root.display(), e))
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> Result<std::path::PathBuf, AppError> {
        if !is_valid_key(key) {
            return Err(AppError::BadRequest(format!("Invalid object key '{key}'")));
        }
        Ok(self.root.join(key))
    }
}

#[cfg(feature = "ssr")]
#[async_trait]
impl StorageClient for FsStorageClient {
    async fn put_object(&self, key: &str, content: Vec<u8>) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to put object '{}': {}", key, e)))
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to get object '{}': {}",
                key, e
            ))),
        }
    }
}
