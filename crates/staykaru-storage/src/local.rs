use crate::keys::{category_key, thumbnail_filename, validate_filename};
use crate::traits::{ByteStream, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use futures::StreamExt;
use staykaru_core::UploadCategory;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    url_prefix: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Uploads root (e.g. "uploads")
    /// * `url_prefix` - Prefix of returned URLs (e.g. "/images")
    pub async fn new(base_path: impl Into<PathBuf>, url_prefix: impl Into<String>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a filename and category into a filesystem path with security validation
    fn key_to_path(&self, filename: &str, category: UploadCategory) -> StorageResult<PathBuf> {
        validate_filename(filename)?;

        let path = self.base_path.join(category_key(filename, category));

        // Symlinked files must not lead outside the uploads root.
        if let (Ok(canonical), Ok(base_canonical)) =
            (path.canonicalize(), self.base_path.canonicalize())
        {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn path_for(&self, filename: &str, category: UploadCategory) -> StorageResult<PathBuf> {
        self.key_to_path(filename, category)
    }

    fn url_for(&self, filename: &str, category: UploadCategory) -> String {
        format!("{}/{}", self.url_prefix, category_key(filename, category))
    }

    async fn ensure_category_dir(&self, category: UploadCategory) -> StorageResult<PathBuf> {
        let dir = self.base_path.join(category.dir_name());
        fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create category directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(dir)
    }

    async fn exists(&self, filename: &str, category: UploadCategory) -> StorageResult<bool> {
        let path = self.key_to_path(filename, category)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn read(&self, filename: &str, category: UploadCategory) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(filename, category)?;
        let start = std::time::Instant::now();

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(category_key(filename, category)));
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to read file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        tracing::debug!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage read successful"
        );

        Ok(data)
    }

    async fn read_stream(
        &self,
        filename: &str,
        category: UploadCategory,
    ) -> StorageResult<ByteStream> {
        let path = self.key_to_path(filename, category)?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(category_key(filename, category)));
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let path_display = path.display().to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(path = %path_display, error = %e, "Local storage stream read error");
                StorageError::ReadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    async fn delete(&self, filename: &str, category: UploadCategory) -> StorageResult<()> {
        let path = self.key_to_path(filename, category)?;
        let start = std::time::Instant::now();

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(category_key(filename, category)));
            }
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                )));
            }
        }

        // Thumbnails are optional derivatives; their absence is not a failure.
        let thumb_name = thumbnail_filename(filename);
        let thumb_path = self.base_path.join(category_key(&thumb_name, category));
        match fs::remove_file(&thumb_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %thumb_path.display(), "No thumbnail to delete");
            }
            Err(e) => {
                tracing::warn!(
                    path = %thumb_path.display(),
                    error = %e,
                    "Failed to delete thumbnail"
                );
            }
        }

        tracing::info!(
            path = %path.display(),
            category = %category,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn health_check(&self) -> StorageResult<()> {
        let probe = self.base_path.join(".health-probe");
        fs::write(&probe, b"ok").await?;
        fs::remove_file(&probe).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage_in(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "/images").await.unwrap()
    }

    async fn put(storage: &LocalStorage, filename: &str, category: UploadCategory, data: &[u8]) {
        storage.ensure_category_dir(category).await.unwrap();
        let path = storage.path_for(filename, category).unwrap();
        fs::write(path, data).await.unwrap();
    }

    #[tokio::test]
    async fn test_path_and_url_mapping() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let path = storage
            .path_for("image-1-2.jpg", UploadCategory::Accommodations)
            .unwrap();
        assert_eq!(path, dir.path().join("accommodations").join("image-1-2.jpg"));
        assert_eq!(
            storage.url_for("image-1-2.jpg", UploadCategory::MenuItems),
            "/images/menu-items/image-1-2.jpg"
        );
    }

    #[tokio::test]
    async fn test_read_returns_written_bytes() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;
        put(&storage, "a.jpg", UploadCategory::General, b"jpeg bytes").await;

        assert!(storage.exists("a.jpg", UploadCategory::General).await.unwrap());
        let data = storage.read("a.jpg", UploadCategory::General).await.unwrap();
        assert_eq!(data, b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_exists_surfaces_io_errors() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;
        // A plain file where the category directory should be
        fs::write(dir.path().join("general"), b"not a dir").await.unwrap();

        let result = storage.exists("a.jpg", UploadCategory::General).await;
        assert!(matches!(result, Err(StorageError::IoError(_))));

        assert!(!storage.exists("a.jpg", UploadCategory::MenuItems).await.unwrap());
    }

    #[tokio::test]
    async fn test_categories_do_not_collide() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;
        put(&storage, "a.jpg", UploadCategory::Accommodations, b"x").await;

        assert!(!storage.exists("a.jpg", UploadCategory::FoodProviders).await.unwrap());
        let result = storage.read("a.jpg", UploadCategory::FoodProviders).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_read_stream_yields_file_contents() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;
        put(&storage, "s.png", UploadCategory::General, b"stream body").await;

        let mut stream = storage.read_stream("s.png", UploadCategory::General).await.unwrap();
        let mut collected = Vec::new();
        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(collected, b"stream body");
    }

    #[tokio::test]
    async fn test_delete_removes_image_and_thumbnail() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;
        put(&storage, "a.jpg", UploadCategory::MenuItems, b"main").await;
        put(&storage, "a_thumb.jpg", UploadCategory::MenuItems, b"thumb").await;

        storage.delete("a.jpg", UploadCategory::MenuItems).await.unwrap();

        assert!(!storage.exists("a.jpg", UploadCategory::MenuItems).await.unwrap());
        assert!(!storage.exists("a_thumb.jpg", UploadCategory::MenuItems).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_without_thumbnail_succeeds() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;
        put(&storage, "a.jpg", UploadCategory::General, b"main").await;

        storage.delete("a.jpg", UploadCategory::General).await.unwrap();
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;
        put(&storage, "a.jpg", UploadCategory::General, b"main").await;

        storage.delete("a.jpg", UploadCategory::General).await.unwrap();
        let second = storage.delete("a.jpg", UploadCategory::General).await;
        assert!(matches!(second, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let result = storage.read("../../../etc/passwd", UploadCategory::General).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("..", UploadCategory::General).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd", UploadCategory::General).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_health_check_on_writable_root() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;
        storage.health_check().await.unwrap();
    }
}
