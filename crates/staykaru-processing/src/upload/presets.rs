use staykaru_core::{UploadCategory, UploadConfig};

use crate::compression::OutputFormat;
use crate::image::{FitStrategy, ProcessOptions, ResizeOptions};

/// Per-category processing defaults.
///
/// Accommodation, food-provider and menu-item images are cover-cropped to
/// their configured box; general uploads keep their size.
#[derive(Debug, Clone)]
pub struct UploadPresets {
    pub accommodation: ResizeOptions,
    pub food_provider: ResizeOptions,
    pub menu_item: ResizeOptions,
    pub quality: u8,
}

impl Default for UploadPresets {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}

impl UploadPresets {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            accommodation: ResizeOptions::from_spec(
                config.accommodation_image_size,
                FitStrategy::Cover,
            ),
            food_provider: ResizeOptions::from_spec(
                config.food_provider_image_size,
                FitStrategy::Cover,
            ),
            menu_item: ResizeOptions::from_spec(config.menu_item_image_size, FitStrategy::Cover),
            quality: config.image_quality,
        }
    }

    pub fn options_for(&self, category: UploadCategory) -> ProcessOptions {
        let resize = match category {
            UploadCategory::Accommodations => Some(self.accommodation),
            UploadCategory::FoodProviders => Some(self.food_provider),
            UploadCategory::MenuItems => Some(self.menu_item),
            UploadCategory::General => None,
        };

        ProcessOptions {
            resize,
            quality: self.quality,
            format: OutputFormat::Jpeg,
            generate_thumbnail: true,
        }
    }
}
