//! Shared filename rules for storage backends.

use staykaru_core::UploadCategory;

use crate::traits::{StorageError, StorageResult};

/// Suffix inserted before the extension of a thumbnail.
pub const THUMBNAIL_SUFFIX: &str = "_thumb";

/// Reject anything that is not a plain single-component filename.
pub fn validate_filename(filename: &str) -> StorageResult<()> {
    if filename.is_empty()
        || filename.starts_with('.')
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0')
    {
        return Err(StorageError::InvalidKey(format!(
            "Invalid filename: {}",
            filename
        )));
    }
    Ok(())
}

/// Relative key of a file: `<category>/<filename>`.
pub fn category_key(filename: &str, category: UploadCategory) -> String {
    format!("{}/{}", category.dir_name(), filename)
}

/// Name of the thumbnail that belongs to `filename`: `_thumb` goes before the
/// extension, so `image-1-2.jpg` becomes `image-1-2_thumb.jpg`.
pub fn thumbnail_filename(filename: &str) -> String {
    match filename.rfind('.') {
        Some(dot) if dot > 0 => format!(
            "{}{}{}",
            &filename[..dot],
            THUMBNAIL_SUFFIX,
            &filename[dot..]
        ),
        _ => format!("{}{}", filename, THUMBNAIL_SUFFIX),
    }
}
