//! StayKaru Storage Library
//!
//! Category-partitioned storage for uploaded images.
//!
//! # Layout
//!
//! - Image: `<root>/<category>/<filename>`, served at `<url_prefix>/<category>/<filename>`
//! - Thumbnail: `<root>/<category>/<stem>_thumb.<ext>`
//!
//! Filenames are single path components. Anything carrying a separator, `..`
//! or a leading dot is rejected with `StorageError::InvalidKey`. Key handling is
//! centralized in the `keys` module so the path and URL views stay in sync.

pub mod factory;
pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::thumbnail_filename;
pub use local::LocalStorage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
