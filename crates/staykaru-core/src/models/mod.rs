pub mod category;
pub mod image;

pub use category::UploadCategory;
pub use image::{ImageDimensions, UploadedImage};
