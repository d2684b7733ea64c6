//! Grid resampling
//!
//! Downsamples source pictures onto the working grid and upsamples processed
//! grids for preview.

use image::RgbImage;
use image::imageops::{self, FilterType};
use log::debug;

use crate::error::{BurnError, Result};

/// Resample `input` to exactly `width` x `height`.
///
/// With `high_quality` a triangle (bilinear) filter is used. Its support grows
/// with the reduction factor, so downsampling averages every source pixel
/// under a cell instead of picking one. Without it, nearest-neighbour sampling
/// is used, which keeps shade edges crisp in an upscaled preview.
pub fn resize(input: &RgbImage, width: u32, height: u32, high_quality: bool) -> Result<RgbImage> {
    if width == 0 || height == 0 {
        return Err(BurnError::InvalidDimensions { width, height });
    }
    let (src_width, src_height) = input.dimensions();
    if src_width == 0 || src_height == 0 {
        return Err(BurnError::InvalidDimensions {
            width: src_width,
            height: src_height,
        });
    }

    let filter = if high_quality {
        FilterType::Triangle
    } else {
        FilterType::Nearest
    };
    debug!(
        "Resampling {}x{} -> {}x{} ({:?})",
        input.width(),
        input.height(),
        width,
        height,
        filter
    );

    Ok(imageops::resize(input, width, height, filter))
}
