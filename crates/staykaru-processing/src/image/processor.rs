//! Image processor - decode, resize, re-encode and derive a thumbnail

use image::{DynamicImage, GenericImageView, ImageReader};
use staykaru_storage::thumbnail_filename;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::resize::{apply_plan, plan_resize, select_filter, ResizeOptions};
use crate::compression::{ImageCompressor, OutputFormat};
use crate::error::ProcessingError;

pub const DEFAULT_QUALITY: u8 = 85;
pub const THUMBNAIL_SIZE: u32 = 200;
pub const THUMBNAIL_QUALITY: u8 = 80;

/// Processing options for one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    pub resize: Option<ResizeOptions>,
    pub quality: u8,
    pub format: OutputFormat,
    pub generate_thumbnail: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            resize: None,
            quality: DEFAULT_QUALITY,
            format: OutputFormat::Jpeg,
            generate_thumbnail: true,
        }
    }
}

/// Result of processing: describes the file that was written, not the source.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    pub format: OutputFormat,
    pub thumbnail_path: Option<PathBuf>,
}

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode `source`, apply `options` and write the result to `dest`.
    ///
    /// `dest` may be the same file as `source`. The thumbnail lands next to
    /// `dest` as `<stem>_thumb.<ext>`. On error nothing written by this call
    /// is left behind.
    pub fn process(
        source: &Path,
        dest: &Path,
        options: &ProcessOptions,
    ) -> Result<ProcessedImage, ProcessingError> {
        let start = std::time::Instant::now();

        if !(1..=100).contains(&options.quality) {
            return Err(ProcessingError::InvalidOptions(format!(
                "quality must be between 1 and 100, got {}",
                options.quality
            )));
        }

        let data = std::fs::read(source).map_err(|e| ProcessingError::Read {
            path: source.to_path_buf(),
            source: e,
        })?;
        let img = Self::decode(&data)?;
        let (orig_width, orig_height) = img.dimensions();

        let thumbnail = if options.generate_thumbnail {
            Some(Self::thumbnail(&img)?)
        } else {
            None
        };

        let plan = plan_resize(orig_width, orig_height, options.resize.as_ref());
        let resized = apply_plan(img, plan);
        let (width, height) = resized.dimensions();
        let encoded = ImageCompressor::encode(&resized, options.format, options.quality)?;

        let thumbnail_path = match thumbnail {
            Some(bytes) => {
                let path = Self::thumbnail_path(dest);
                write_file(&path, &bytes)?;
                Some(path)
            }
            None => None,
        };

        if let Err(e) = write_file(dest, &encoded) {
            if let Some(path) = &thumbnail_path {
                let _ = std::fs::remove_file(path);
            }
            return Err(e);
        }

        tracing::debug!(
            source = %source.display(),
            dest = %dest.display(),
            orig_width,
            orig_height,
            width,
            height,
            size_bytes = encoded.len(),
            thumbnail = thumbnail_path.is_some(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image processed"
        );

        Ok(ProcessedImage {
            path: dest.to_path_buf(),
            width,
            height,
            size_bytes: encoded.len() as u64,
            format: options.format,
            thumbnail_path,
        })
    }

    /// Decode image bytes, guessing the format from the header
    pub fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ProcessingError::Decode(e.to_string()))?;
        if reader.format().is_none() {
            return Err(ProcessingError::Decode("unrecognized image format".to_string()));
        }
        reader
            .decode()
            .map_err(|e| ProcessingError::Decode(e.to_string()))
    }

    /// 200x200 cover-cropped JPEG at quality 80
    pub fn thumbnail(img: &DynamicImage) -> Result<Vec<u8>, ProcessingError> {
        let (orig_width, orig_height) = img.dimensions();
        let filter = select_filter(orig_width, orig_height, THUMBNAIL_SIZE, THUMBNAIL_SIZE);
        let thumb = img.resize_to_fill(THUMBNAIL_SIZE, THUMBNAIL_SIZE, filter);
        ImageCompressor::encode(&thumb, OutputFormat::Jpeg, THUMBNAIL_QUALITY)
    }

    /// Where the thumbnail of `dest` is written
    pub fn thumbnail_path(dest: &Path) -> PathBuf {
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        dest.with_file_name(thumbnail_filename(&name))
    }
}

/// Write `data` to `path`, removing the partial file on failure.
fn write_file(path: &Path, data: &[u8]) -> Result<(), ProcessingError> {
    std::fs::write(path, data).map_err(|e| {
        let _ = std::fs::remove_file(path);
        ProcessingError::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })
}
