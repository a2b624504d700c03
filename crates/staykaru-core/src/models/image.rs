use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Pixel dimensions of a stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Metadata describing one successfully processed upload.
///
/// Only returned to the caller; persisting `url` on the owning entity is the
/// caller's job.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Client-supplied filename, sanitized and display-only.
    pub original_name: String,
    /// Server-generated name, the only key for later retrieval or deletion.
    #[serde(rename = "filename")]
    pub stored_filename: String,
    #[serde(rename = "mimetype")]
    #[schema(example = "image/jpeg")]
    pub mime_type: String,
    /// Size of the processed file in bytes.
    #[serde(rename = "size")]
    pub size_bytes: u64,
    pub dimensions: ImageDimensions,
    #[schema(example = "/images/accommodations/image-1718000000000-123456789.jpg")]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}
