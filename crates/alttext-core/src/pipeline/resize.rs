//! Width-targeted resizing that preserves aspect ratio.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::config::ResizeConfig;

/// Produces scaled copies of a source image at fixed target widths.
pub struct Resizer {
    filter: FilterType,
}

impl Resizer {
    /// Create a new resizer with the given configuration.
    pub fn new(config: &ResizeConfig) -> Self {
        Self {
            filter: config.filter.into(),
        }
    }

    /// Height that keeps the aspect ratio at `target_width`.
    ///
    /// `round(height * target_width / width)`, never below one pixel.
    pub fn target_height(width: u32, height: u32, target_width: u32) -> u32 {
        let scaled = (height as f64 * (target_width as f64 / width as f64)).round();
        (scaled as u32).max(1)
    }

    /// Return a copy of `image` exactly `target_width` pixels wide.
    ///
    /// Upscaling is allowed. The source image is left untouched.
    pub fn resize(&self, image: &DynamicImage, target_width: u32) -> DynamicImage {
        let height = Self::target_height(image.width(), image.height(), target_width);
        image.resize_exact(target_width, height, self.filter)
    }
}
