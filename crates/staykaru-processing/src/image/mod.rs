pub mod processor;
pub mod resize;

pub use processor::{ImageProcessor, ProcessOptions, ProcessedImage};
pub use resize::{apply_plan, plan_resize, FitStrategy, ResizeOptions, ResizePlan};
