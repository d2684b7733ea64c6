//! Raster stages of the pipeline
//!
//! Turns a decoded picture into the small grid of shade indices the toolpath
//! generator walks:
//! 1. Resample the source down to the working grid (bilinear, anti-aliased)
//! 2. Convert to luminance
//! 3. Stretch luminance over the full 0..255 range
//! 4. Bucket into a fixed number of shades
//!
//! The same module renders a quantized grid back into a gray preview image.

mod quantize;
mod resample;

use image::RgbImage;

pub use quantize::{
    LuminanceGrid, Normalized, QuantizedGrid, bucket, normalize, quantize, render_preview,
    to_luminance,
};
pub use resample::resize;

/// RGB working grid, one sample per cell.
pub type RasterGrid = RgbImage;
