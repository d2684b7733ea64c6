//! Image to G-code pipeline
//!
//! The conversion process:
//! 1. Validate parameters (nothing runs on bad input)
//! 2. Resample the picture to the working grid
//! 3. Quantize to shade indices
//! 4. Generate the serpentine toolpath
//! 5. Emit G-code text

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageReader, RgbImage};
use log::info;

use crate::error::{BurnError, Result};
use crate::params::GenerationParameters;
use crate::raster::{QuantizedGrid, RasterGrid, quantize, render_preview, resize};
use crate::toolpath::{Toolpath, emit_gcode, generate};

/// Cell and move counts for one compilation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Cells in the working grid.
    pub cells: usize,
    /// Feed moves emitted.
    pub moves: usize,
}

impl Summary {
    pub fn cells_per_move(&self) -> f64 {
        if self.moves == 0 {
            0.0
        } else {
            self.cells as f64 / self.moves as f64
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of pixels: {}", self.cells)?;
        writeln!(f, "Number of moves: {}", self.moves)?;
        write!(f, "Pixels per move: {:.4}", self.cells_per_move())
    }
}

/// Everything produced by one run.
pub struct Compilation {
    pub grid: QuantizedGrid,
    pub toolpath: Toolpath,
    pub gcode: String,
    pub summary: Summary,
    /// Dimensions of the decoded source image.
    pub source_width: u32,
    pub source_height: u32,
}

impl Compilation {
    /// Gray rendering of the quantized grid at source resolution.
    pub fn preview(&self) -> Result<RgbImage> {
        render_preview(&self.grid, self.source_width, self.source_height)
    }
}

/// Compile a decoded image.
pub fn compile_image(img: &DynamicImage, params: &GenerationParameters) -> Result<Compilation> {
    params.validate()?;
    compile_validated(img, params)
}

/// Compile with parameters that already passed `validate`.
fn compile_validated(img: &DynamicImage, params: &GenerationParameters) -> Result<Compilation> {
    let (source_width, source_height) = img.dimensions();
    if source_width == 0 || source_height == 0 {
        return Err(BurnError::InvalidDimensions {
            width: source_width,
            height: source_height,
        });
    }
    let rgb: RasterGrid = img.to_rgb8();

    let small = resize(&rgb, params.columns, params.rows, true)?;
    let grid = quantize(&small, params.num_shades)?;
    let toolpath = generate(&grid, params)?;
    let gcode = emit_gcode(&toolpath, params.units, params.precision);

    let summary = Summary {
        cells: grid.cell_count(),
        moves: toolpath.feed_count(),
    };
    info!(
        "Compiled {}x{} image into {} moves over {} cells",
        source_width, source_height, summary.moves, summary.cells
    );

    Ok(Compilation {
        grid,
        toolpath,
        gcode,
        summary,
        source_width,
        source_height,
    })
}

/// Compile an image from encoded bytes (PNG, JPEG).
pub fn compile_image_bytes(bytes: &[u8], params: &GenerationParameters) -> Result<Compilation> {
    params.validate()?;
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    compile_validated(&img, params)
}

/// Compile an image file.
pub fn compile_image_file(
    path: impl AsRef<Path>,
    params: &GenerationParameters,
) -> Result<Compilation> {
    params.validate()?;
    let img = ImageReader::open(path)?.decode()?;
    compile_validated(&img, params)
}
