//! Multipart helpers shared by the upload handlers

use axum::extract::Multipart;
use staykaru_core::AppError;
use staykaru_processing::IncomingFile;

use crate::error::HttpAppError;

/// Field names accepted for batch uploads
pub const BATCH_FIELDS: &[&str] = &["images", "images[]"];

/// Field name for single-image uploads
pub const SINGLE_FIELD: &[&str] = &["image"];

/// Collect the file parts named in `field_names`.
///
/// Fails with 400 when no file was sent or when more than `max_files` arrive;
/// the count is checked before reading the offending part's body. Other fields
/// are skipped.
pub async fn extract_image_files(
    mut multipart: Multipart,
    field_names: &[&str],
    max_files: usize,
) -> Result<Vec<IncomingFile>, HttpAppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        if !field_names.contains(&field_name.as_str()) {
            tracing::debug!(field = %field_name, "Skipping unexpected multipart field");
            continue;
        }

        if files.len() >= max_files {
            return Err(AppError::BadRequest(format!(
                "Too many files: at most {} allowed per request",
                max_files
            ))
            .into());
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| content_type_from_extension(&filename).to_string());

        let data = field.bytes().await?;

        tracing::debug!(
            filename = %filename,
            content_type = %content_type,
            size_bytes = data.len(),
            "Received multipart file"
        );
        files.push(IncomingFile::new(filename, content_type, data));
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("No files uploaded".to_string()).into());
    }

    Ok(files)
}

/// Best guess of a MIME type from a filename, for parts sent without one
pub fn content_type_from_extension(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}
