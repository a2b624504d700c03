use chrono::Utc;
use futures::future::join_all;
use staykaru_core::{ImageDimensions, UploadCategory, UploadedImage};
use staykaru_storage::{thumbnail_filename, Storage, StorageError};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use super::guard::OutputGuard;
use super::naming::{generate_filename, sanitize_filename};
use super::types::{BatchUploadResult, IncomingFile, UploadError, UploadFailure};
use crate::error::ProcessingError;
use crate::image::{ImageProcessor, ProcessOptions};
use crate::validator::ImageValidator;

/// Runs uploads end to end and reports per-file outcomes.
#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn Storage>,
    validator: ImageValidator,
}

impl UploadService {
    pub fn new(storage: Arc<dyn Storage>, validator: ImageValidator) -> Self {
        Self { storage, validator }
    }

    /// Upload every file independently.
    ///
    /// Files run concurrently and the result is assembled once all of them have
    /// finished. Only a category directory that cannot be created fails the
    /// whole call; anything else becomes an entry in `errors`.
    #[tracing::instrument(skip(self, files, options), fields(category = %category, file_count = files.len()))]
    pub async fn upload_many(
        &self,
        files: Vec<IncomingFile>,
        category: UploadCategory,
        options: &ProcessOptions,
    ) -> Result<BatchUploadResult, UploadError> {
        let dir = self.storage.ensure_category_dir(category).await?;

        let outcomes = join_all(files.into_iter().map(|file| {
            let original_name = file.original_name.clone();
            let dir = dir.clone();
            async move {
                self.upload_file(file, category, dir, options)
                    .await
                    .map_err(|error| UploadFailure {
                        original_name,
                        error,
                    })
            }
        }))
        .await;

        let result = BatchUploadResult::from_outcomes(outcomes);

        for failure in &result.failures {
            match &failure.error {
                UploadError::Storage(e) => tracing::error!(
                    original_name = %sanitize_filename(&failure.original_name),
                    error = %e,
                    "Image upload failed to store"
                ),
                e => tracing::warn!(
                    original_name = %sanitize_filename(&failure.original_name),
                    error = %e,
                    "Image upload rejected"
                ),
            }
        }

        tracing::info!(
            uploaded = result.images.len(),
            failed = result.failures.len(),
            "Batch upload finished"
        );

        Ok(result)
    }

    /// Upload a single file, surfacing its error directly.
    pub async fn upload_one(
        &self,
        file: IncomingFile,
        category: UploadCategory,
        options: &ProcessOptions,
    ) -> Result<UploadedImage, UploadError> {
        let mut result = self.upload_many(vec![file], category, options).await?;

        if let Some(failure) = result.failures.into_iter().next() {
            return Err(failure.error);
        }

        result.images.pop().ok_or_else(|| {
            UploadError::Processing(ProcessingError::Task("no image produced".to_string()))
        })
    }

    async fn upload_file(
        &self,
        file: IncomingFile,
        category: UploadCategory,
        dir: PathBuf,
        options: &ProcessOptions,
    ) -> Result<UploadedImage, UploadError> {
        // Reject before anything is written.
        self.validator.validate(&file)?;

        let filename = generate_filename(options.format);
        let dest = self.storage.path_for(&filename, category)?;
        let thumb_dest = ImageProcessor::thumbnail_path(&dest);
        let options = options.clone();
        let original_name = file.original_name;
        let data = file.data;

        // The guard is created inside the blocking task so that it is dropped
        // (and cleans up) even when the awaiting request is cancelled.
        let (guard, processed) = tokio::task::spawn_blocking(move || {
            let guard = OutputGuard::new(vec![dest.clone(), thumb_dest]);

            let mut staging = tempfile::Builder::new()
                .prefix(".upload-")
                .tempfile_in(&dir)
                .map_err(StorageError::from)?;
            staging.write_all(&data).map_err(StorageError::from)?;
            staging.flush().map_err(StorageError::from)?;

            let processed = ImageProcessor::process(staging.path(), &dest, &options)?;
            Ok::<_, UploadError>((guard, processed))
        })
        .await
        .map_err(|e| UploadError::Processing(ProcessingError::Task(e.to_string())))??;

        let thumbnail_url = processed
            .thumbnail_path
            .as_ref()
            .map(|_| self.storage.url_for(&thumbnail_filename(&filename), category));

        let image = UploadedImage {
            original_name,
            url: self.storage.url_for(&filename, category),
            stored_filename: filename,
            mime_type: processed.format.to_mime_type().to_string(),
            size_bytes: processed.size_bytes,
            dimensions: ImageDimensions {
                width: processed.width,
                height: processed.height,
            },
            thumbnail_url,
            uploaded_at: Utc::now(),
        };

        guard.commit();

        tracing::info!(
            filename = %image.stored_filename,
            category = %category,
            width = image.dimensions.width,
            height = image.dimensions.height,
            size_bytes = image.size_bytes,
            "Image uploaded"
        );

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::OutputFormat;
    use crate::image::{FitStrategy, ResizeOptions};
    use crate::upload::UploadPresets;
    use crate::validator::ValidationError;
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
    use staykaru_storage::LocalStorage;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    const FIVE_MIB: u64 = 5 * 1024 * 1024;

    fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 251) as u8, (y % 241) as u8, 90])
        });
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), format)
            .unwrap();
        buffer
    }

    fn jpeg(name: &str, width: u32, height: u32) -> IncomingFile {
        IncomingFile::new(name, "image/jpeg", encode(width, height, ImageFormat::Jpeg))
    }

    async fn service(root: &Path) -> UploadService {
        let storage = LocalStorage::new(root, "/images").await.unwrap();
        UploadService::new(Arc::new(storage), ImageValidator::new(FIVE_MIB))
    }

    fn files_in(dir: &Path) -> Vec<String> {
        match std::fs::read_dir(dir) {
            Ok(entries) => {
                let mut names: Vec<String> = entries
                    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                    .collect();
                names.sort();
                names
            }
            Err(_) => Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_accommodation_upload_produces_image_and_thumbnail() {
        let root = tempdir().unwrap();
        let service = service(root.path()).await;
        let options = UploadPresets::default().options_for(UploadCategory::Accommodations);

        let image = service
            .upload_one(jpeg("villa.jpg", 3000, 2000), UploadCategory::Accommodations, &options)
            .await
            .unwrap();

        assert_eq!(image.original_name, "villa.jpg");
        assert_eq!(image.dimensions, ImageDimensions { width: 1200, height: 800 });
        assert_eq!(image.mime_type, "image/jpeg");
        assert!(image.stored_filename.ends_with(".jpg"));
        assert_eq!(
            image.url,
            format!("/images/accommodations/{}", image.stored_filename)
        );

        let dir = root.path().join("accommodations");
        let stored = std::fs::read(dir.join(&image.stored_filename)).unwrap();
        assert_eq!(stored.len() as u64, image.size_bytes);

        let thumb_name = thumbnail_filename(&image.stored_filename);
        assert_eq!(
            image.thumbnail_url.as_deref(),
            Some(format!("/images/accommodations/{}", thumb_name).as_str())
        );
        let thumb = image::open(dir.join(&thumb_name)).unwrap();
        assert_eq!(thumb.dimensions(), (200, 200));

        // Only the image and its thumbnail remain; staging files are gone.
        assert_eq!(files_in(&dir).len(), 2);
    }

    #[tokio::test]
    async fn test_batch_with_corrupt_file_in_the_middle() {
        let root = tempdir().unwrap();
        let service = service(root.path()).await;
        let options = UploadPresets::default().options_for(UploadCategory::FoodProviders);

        let files = vec![
            jpeg("first.jpg", 1600, 1200),
            IncomingFile::new("broken.jpg", "image/jpeg", b"\xFF\xD8\xFF garbage".to_vec()),
            IncomingFile::new("third.png", "image/png", encode(640, 480, ImageFormat::Png)),
        ];

        let result = service
            .upload_many(files, UploadCategory::FoodProviders, &options)
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.images.len(), 2);
        assert_eq!(result.images[0].original_name, "first.jpg");
        assert_eq!(result.images[1].original_name, "third.png");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("broken.jpg: "));
        assert!(matches!(result.failures[0].error, UploadError::Processing(_)));

        // Two images, two thumbnails, nothing from the broken file.
        assert_eq!(files_in(&root.path().join("food-providers")).len(), 4);
    }

    #[tokio::test]
    async fn test_client_filename_is_reported_as_sent() {
        let root = tempdir().unwrap();
        let service = service(root.path()).await;
        let options = UploadPresets::default().options_for(UploadCategory::Accommodations);

        let files = vec![
            jpeg("pool view.jpg", 800, 600),
            IncomingFile::new("my photo.gif", "image/gif", b"GIF89a\x01\x00\x01\x00".to_vec()),
        ];
        let result = service
            .upload_many(files, UploadCategory::Accommodations, &options)
            .await
            .unwrap();

        assert_eq!(result.images[0].original_name, "pool view.jpg");
        assert_eq!(result.failures[0].original_name, "my photo.gif");
        assert!(result.errors[0].starts_with("my photo.gif: "));
    }

    #[tokio::test]
    async fn test_rejected_files_never_touch_disk() {
        let root = tempdir().unwrap();
        let service = service(root.path()).await;
        let options = ProcessOptions::default();

        let gif = IncomingFile::new("anim.gif", "image/gif", b"GIF89a\x01\x00\x01\x00".to_vec());
        let err = service
            .upload_one(gif, UploadCategory::General, &options)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UploadError::Validation(ValidationError::UnsupportedType { .. })
        ));

        let huge = IncomingFile::new("huge.png", "image/png", vec![0u8; 6 * 1024 * 1024]);
        let err = service
            .upload_one(huge, UploadCategory::General, &options)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UploadError::Validation(ValidationError::TooLarge { .. })
        ));

        assert!(files_in(&root.path().join("general")).is_empty());
    }

    #[tokio::test]
    async fn test_all_successful_batch() {
        let root = tempdir().unwrap();
        let service = service(root.path()).await;
        let options = UploadPresets::default().options_for(UploadCategory::Accommodations);

        let files = (0..3).map(|i| jpeg(&format!("room-{}.jpg", i), 800, 600)).collect();
        let result = service
            .upload_many(files, UploadCategory::Accommodations, &options)
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.errors.is_empty());
        let names: Vec<&str> = result.images.iter().map(|i| i.original_name.as_str()).collect();
        assert_eq!(names, vec!["room-0.jpg", "room-1.jpg", "room-2.jpg"]);
        let mut stored: Vec<&str> = result
            .images
            .iter()
            .map(|i| i.stored_filename.as_str())
            .collect();
        stored.sort();
        stored.dedup();
        assert_eq!(stored.len(), 3);
    }

    #[tokio::test]
    async fn test_thumbnail_disabled_and_custom_format() {
        let root = tempdir().unwrap();
        let service = service(root.path()).await;
        let options = ProcessOptions {
            resize: Some(ResizeOptions::new(300, 300, FitStrategy::Inside)),
            quality: 70,
            format: OutputFormat::WebP,
            generate_thumbnail: false,
        };

        let image = service
            .upload_one(jpeg("dish.jpg", 900, 600), UploadCategory::MenuItems, &options)
            .await
            .unwrap();

        assert_eq!(image.mime_type, "image/webp");
        assert!(image.stored_filename.ends_with(".webp"));
        assert_eq!(image.dimensions, ImageDimensions { width: 300, height: 200 });
        assert!(image.thumbnail_url.is_none());
        assert_eq!(files_in(&root.path().join("menu-items")).len(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch_succeeds_with_nothing() {
        let root = tempdir().unwrap();
        let service = service(root.path()).await;

        let result = service
            .upload_many(Vec::new(), UploadCategory::General, &ProcessOptions::default())
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.images.is_empty());
    }
}
