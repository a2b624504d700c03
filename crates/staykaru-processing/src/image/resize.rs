use image::{imageops, DynamicImage, GenericImageView, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use staykaru_core::ImageDimensionsSpec;

/// How the source aspect ratio is reconciled with the target box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitStrategy {
    /// Crop to exactly the target aspect ratio
    #[default]
    Cover,
    /// Letterbox onto a white canvas
    Contain,
    /// Stretch, ignoring aspect ratio
    Fill,
    /// Fit within the box
    Inside,
    /// Cover the box without cropping
    Outside,
}

/// Resize request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: FitStrategy,
}

impl ResizeOptions {
    pub fn new(width: u32, height: u32, fit: FitStrategy) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            fit,
        }
    }

    pub fn from_spec(spec: ImageDimensionsSpec, fit: FitStrategy) -> Self {
        Self {
            width: spec.width,
            height: spec.height,
            fit,
        }
    }
}

/// Concrete operation derived from the source size and a `ResizeOptions`.
///
/// Every variant is bounded by the source dimensions: nothing is ever enlarged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePlan {
    Keep,
    /// Resample to exactly these dimensions
    Scale { width: u32, height: u32 },
    /// Scale to cover the box, then centre-crop to it
    Crop { width: u32, height: u32 },
    /// Scale to `inner`, centre on a white `canvas`
    Letterbox {
        canvas_width: u32,
        canvas_height: u32,
        inner_width: u32,
        inner_height: u32,
    },
}

impl ResizePlan {
    /// Dimensions of the image the plan produces
    pub fn output_dimensions(&self, orig_width: u32, orig_height: u32) -> (u32, u32) {
        match *self {
            ResizePlan::Keep => (orig_width, orig_height),
            ResizePlan::Scale { width, height } | ResizePlan::Crop { width, height } => {
                (width, height)
            }
            ResizePlan::Letterbox {
                canvas_width,
                canvas_height,
                ..
            } => (canvas_width, canvas_height),
        }
    }
}

fn scaled(side: u32, scale: f64) -> u32 {
    ((side as f64 * scale).round() as u32).max(1)
}

fn keep_or_scale(orig_width: u32, orig_height: u32, width: u32, height: u32) -> ResizePlan {
    if (width, height) == (orig_width, orig_height) {
        ResizePlan::Keep
    } else {
        ResizePlan::Scale { width, height }
    }
}

/// Work out what to do with an `orig_width` x `orig_height` image.
pub fn plan_resize(orig_width: u32, orig_height: u32, options: Option<&ResizeOptions>) -> ResizePlan {
    let Some(options) = options else {
        return ResizePlan::Keep;
    };
    if orig_width == 0 || orig_height == 0 {
        return ResizePlan::Keep;
    }

    let (ow, oh) = (orig_width as f64, orig_height as f64);

    let (target_width, target_height) = match (options.width, options.height) {
        (None, None) => return ResizePlan::Keep,
        // One side given: aspect-preserving for every fit.
        (Some(w), None) => {
            let scale = (w as f64 / ow).min(1.0);
            return keep_or_scale(
                orig_width,
                orig_height,
                scaled(orig_width, scale).min(orig_width),
                scaled(orig_height, scale).min(orig_height),
            );
        }
        (None, Some(h)) => {
            let scale = (h as f64 / oh).min(1.0);
            return keep_or_scale(
                orig_width,
                orig_height,
                scaled(orig_width, scale).min(orig_width),
                scaled(orig_height, scale).min(orig_height),
            );
        }
        (Some(w), Some(h)) => (w.max(1), h.max(1)),
    };
    let (tw, th) = (target_width as f64, target_height as f64);

    match options.fit {
        FitStrategy::Cover => {
            if tw / ow <= 1.0 && th / oh <= 1.0 {
                if (target_width, target_height) == (orig_width, orig_height) {
                    return ResizePlan::Keep;
                }
                return ResizePlan::Crop {
                    width: target_width,
                    height: target_height,
                };
            }
            // The box is larger than the source on some axis: crop the largest
            // box of the requested aspect ratio that fits inside the source.
            let factor = (ow / tw).min(oh / th);
            let width = ((tw * factor).floor() as u32).clamp(1, orig_width);
            let height = ((th * factor).floor() as u32).clamp(1, orig_height);
            if (width, height) == (orig_width, orig_height) {
                ResizePlan::Keep
            } else {
                ResizePlan::Crop { width, height }
            }
        }
        FitStrategy::Contain => {
            let canvas_width = target_width.min(orig_width);
            let canvas_height = target_height.min(orig_height);
            let scale = (canvas_width as f64 / ow).min(canvas_height as f64 / oh).min(1.0);
            let inner_width = scaled(orig_width, scale).min(canvas_width);
            let inner_height = scaled(orig_height, scale).min(canvas_height);
            if (inner_width, inner_height) == (canvas_width, canvas_height) {
                keep_or_scale(orig_width, orig_height, canvas_width, canvas_height)
            } else {
                ResizePlan::Letterbox {
                    canvas_width,
                    canvas_height,
                    inner_width,
                    inner_height,
                }
            }
        }
        FitStrategy::Fill => keep_or_scale(
            orig_width,
            orig_height,
            target_width.min(orig_width),
            target_height.min(orig_height),
        ),
        FitStrategy::Inside => {
            let scale = (tw / ow).min(th / oh).min(1.0);
            keep_or_scale(
                orig_width,
                orig_height,
                scaled(orig_width, scale).min(target_width),
                scaled(orig_height, scale).min(target_height),
            )
        }
        FitStrategy::Outside => {
            let scale = (tw / ow).max(th / oh).min(1.0);
            keep_or_scale(
                orig_width,
                orig_height,
                scaled(orig_width, scale).min(orig_width),
                scaled(orig_height, scale).min(orig_height),
            )
        }
    }
}

/// Select appropriate filter type based on resize ratio
pub fn select_filter(
    orig_width: u32,
    orig_height: u32,
    new_width: u32,
    new_height: u32,
) -> imageops::FilterType {
    let width_ratio = orig_width as f32 / new_width.max(1) as f32;
    let height_ratio = orig_height as f32 / new_height.max(1) as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        imageops::FilterType::Triangle
    } else if max_ratio > 1.5 {
        imageops::FilterType::CatmullRom
    } else {
        imageops::FilterType::Lanczos3
    }
}

/// Execute a plan
pub fn apply_plan(img: DynamicImage, plan: ResizePlan) -> DynamicImage {
    let (orig_width, orig_height) = img.dimensions();

    match plan {
        ResizePlan::Keep => img,
        ResizePlan::Scale { width, height } => {
            let filter = select_filter(orig_width, orig_height, width, height);
            img.resize_exact(width, height, filter)
        }
        ResizePlan::Crop { width, height } => {
            let filter = select_filter(orig_width, orig_height, width, height);
            img.resize_to_fill(width, height, filter)
        }
        ResizePlan::Letterbox {
            canvas_width,
            canvas_height,
            inner_width,
            inner_height,
        } => {
            let bg_color = Rgba([255u8, 255u8, 255u8, 255u8]);
            let mut canvas = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                canvas_width,
                canvas_height,
                bg_color,
            ));

            let filter = select_filter(orig_width, orig_height, inner_width, inner_height);
            let inner = img.resize_exact(inner_width, inner_height, filter);

            let x_offset = (canvas_width - inner_width) / 2;
            let y_offset = (canvas_height - inner_height) / 2;
            imageops::overlay(&mut canvas, &inner, x_offset as i64, y_offset as i64);

            canvas
        }
    }
}
