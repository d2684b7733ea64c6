//! # raster-burn
//!
//! Turns raster images into G-code for burning pictures with a speed-modulated
//! XY table: the darker a cell, the slower the head crosses it.
//!
//! ## Pipeline
//!
//! - **Resample**: shrink the picture onto a small working grid
//! - **Quantize**: luminance, full-range stretch, bucket into a few shades
//! - **Toolpath**: serpentine scan with run-length collapsed feed moves
//! - **G-code**: `G90`/`G20`/`G94` preamble and one line per move
//!
//! ## Example
//!
//! ```rust,ignore
//! use raster_burn::{GenerationParameters, compile_image_file};
//!
//! let params = GenerationParameters::default();
//! let result = compile_image_file("portrait.png", &params).unwrap();
//! std::fs::write("out.g", result.gcode).unwrap();
//! println!("{}", result.summary);
//! ```

pub mod error;
pub mod params;
pub mod pipeline;
pub mod raster;
pub mod toolpath;

// Re-export commonly used items
pub use error::{BurnError, Result};
pub use params::{GenerationParameters, Units};
pub use pipeline::{Compilation, Summary, compile_image, compile_image_bytes, compile_image_file};
pub use raster::{QuantizedGrid, quantize, resize};
pub use toolpath::{MotionCommand, Toolpath, emit_gcode, generate};
