use crate::upload::IncomingFile;

/// MIME types accepted for upload
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Validation errors for uploaded images
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported file type: {mime_type}. Only JPEG, PNG and WebP images are allowed")]
    UnsupportedType { mime_type: String },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

/// Lowercase the MIME type, drop parameters and fold the `image/jpg` alias.
pub fn normalize_mime_type(content_type: &str) -> String {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase();

    match essence.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg".to_string(),
        _ => essence,
    }
}

/// Upload validator
///
/// Checks the declared type and size before anything touches disk or the decoder.
#[derive(Debug, Clone)]
pub struct ImageValidator {
    max_file_size: u64,
}

impl ImageValidator {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Validate content type
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = normalize_mime_type(content_type);

        if !ALLOWED_IMAGE_TYPES.contains(&normalized.as_str()) {
            return Err(ValidationError::UnsupportedType {
                mime_type: content_type.to_string(),
            });
        }

        Ok(())
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::TooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    pub fn validate(&self, file: &IncomingFile) -> Result<(), ValidationError> {
        self.validate_content_type(&file.content_type)?;
        self.validate_file_size(file.size())
    }
}
