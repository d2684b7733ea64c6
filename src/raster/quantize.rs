//! Shade quantization
//!
//! Three independent passes, each returning a fresh value:
//! luminance conversion, full-range normalization and bucketing.

use image::{Rgb, RgbImage};
use log::{debug, warn};

use super::resample::resize;
use crate::error::{BurnError, Result};
use crate::params::validate_shades;

/// Normalized value assigned to every cell of an image with no contrast.
const UNIFORM_LEVEL: f64 = 128.0;

/// Per-cell luminance in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct LuminanceGrid {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f64>,
}

impl LuminanceGrid {
    /// Build a grid from raw values. `values.len()` must equal `width * height`.
    pub fn from_values(width: u32, height: u32, values: Vec<f64>) -> Result<Self> {
        if values.len() != (width as usize) * (height as usize) {
            return Err(BurnError::InvalidParameter(format!(
                "{} values do not fill a {width}x{height} grid",
                values.len()
            )));
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.values[(y * self.width + x) as usize]
    }
}

/// Output of [`normalize`]: the stretched grid and the observed range.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub grid: LuminanceGrid,
    pub min: f64,
    pub max: f64,
}

impl Normalized {
    /// True when the source had no luminance variance and the fallback was used.
    pub fn is_uniform(&self) -> bool {
        self.max <= self.min
    }
}

/// Working grid reduced to shade indices.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedGrid {
    pub width: u32,
    pub height: u32,
    pub num_shades: u32,
    /// Shade index per cell, row-major, each in `0..num_shades`.
    pub shades: Vec<u8>,
    /// Luminance range seen before normalization. Diagnostic only.
    pub min_luminance: f64,
    pub max_luminance: f64,
}

impl QuantizedGrid {
    pub fn shade(&self, x: u32, y: u32) -> u8 {
        self.shades[(y * self.width + x) as usize]
    }

    /// Shade indices of one row, left to right.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = (y * self.width) as usize;
        &self.shades[start..start + self.width as usize]
    }

    pub fn cell_count(&self) -> usize {
        self.shades.len()
    }

    /// Build a grid from raw shade indices, treated as already spanning the
    /// full luminance range.
    pub fn from_shades(width: u32, height: u32, num_shades: u32, shades: Vec<u8>) -> Result<Self> {
        let grid = Self {
            width,
            height,
            num_shades,
            shades,
            min_luminance: 0.0,
            max_luminance: 255.0,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Check that every cell is present and holds a shade below `num_shades`.
    pub fn validate(&self) -> Result<()> {
        validate_shades(self.num_shades)?;
        if self.shades.len() != (self.width as usize) * (self.height as usize) {
            return Err(BurnError::InvalidParameter(format!(
                "{} shades do not fill a {}x{} grid",
                self.shades.len(),
                self.width,
                self.height
            )));
        }
        if let Some(&shade) = self.shades.iter().find(|&&s| u32::from(s) >= self.num_shades) {
            return Err(BurnError::InvalidParameter(format!(
                "shade {shade} out of range for {} shades",
                self.num_shades
            )));
        }
        Ok(())
    }
}

/// Perceptual luminance of each cell: `0.30 R + 0.59 G + 0.11 B`.
pub fn to_luminance(img: &RgbImage) -> LuminanceGrid {
    let values = img
        .pixels()
        .map(|&Rgb([r, g, b])| 0.30 * f64::from(r) + 0.59 * f64::from(g) + 0.11 * f64::from(b))
        .collect();

    LuminanceGrid {
        width: img.width(),
        height: img.height(),
        values,
    }
}

/// Stretch luminance linearly so the observed range covers `[0, 255]`.
///
/// A grid with no variance cannot be stretched; every cell is set to the
/// mid level instead, which buckets to shade `num_shades / 2`.
pub fn normalize(grid: &LuminanceGrid) -> Normalized {
    let (min, max) = grid
        .values
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;

    let values = if range > 0.0 {
        grid.values
            .iter()
            .map(|&v| (v - min) / range * 255.0)
            .collect()
    } else {
        warn!(
            "Image has uniform luminance ({min:.2}), mapping every cell to level {UNIFORM_LEVEL}"
        );
        vec![UNIFORM_LEVEL; grid.values.len()]
    };

    Normalized {
        grid: LuminanceGrid {
            width: grid.width,
            height: grid.height,
            values,
        },
        min,
        max,
    }
}

/// Bucket normalized luminance into `num_shades` equal-width bins over `[0, 256)`.
pub fn bucket(grid: &LuminanceGrid, num_shades: u32) -> Result<Vec<u8>> {
    validate_shades(num_shades)?;
    let bin = 256.0 / f64::from(num_shades);
    let top = f64::from(num_shades - 1);

    Ok(grid
        .values
        .iter()
        .map(|&v| (v / bin).floor().clamp(0.0, top) as u8)
        .collect())
}

/// Run the three passes over a working grid.
pub fn quantize(img: &RgbImage, num_shades: u32) -> Result<QuantizedGrid> {
    validate_shades(num_shades)?;
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(BurnError::InvalidDimensions { width, height });
    }

    let luminance = to_luminance(img);
    let normalized = normalize(&luminance);
    let shades = bucket(&normalized.grid, num_shades)?;
    debug!(
        "Quantized {}x{} grid to {} shades (luminance {:.2}..{:.2})",
        width, height, num_shades, normalized.min, normalized.max
    );

    Ok(QuantizedGrid {
        width,
        height,
        num_shades,
        shades,
        min_luminance: normalized.min,
        max_luminance: normalized.max,
    })
}

/// Render shades back to gray and upscale to `width` x `height`.
///
/// Shade `s` is drawn at the lower edge of its bin, `s * 256 / num_shades`.
pub fn render_preview(grid: &QuantizedGrid, width: u32, height: u32) -> Result<RgbImage> {
    grid.validate()?;
    let bin = 256.0 / f64::from(grid.num_shades);
    let small = RgbImage::from_fn(grid.width, grid.height, |x, y| {
        let level = (f64::from(grid.shade(x, y)) * bin).min(255.0) as u8;
        Rgb([level, level, level])
    });

    resize(&small, width, height, false)
}
