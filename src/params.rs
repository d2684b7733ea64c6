//! Generation parameters
//!
//! Everything the pipeline needs to turn a picture into moves: where the plot
//! sits on the table, how large it is, how coarse the working grid is, and how
//! shades map onto feed speeds. Loaded from TOML, every field optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BurnError, Result};

/// Largest supported shade count. Shade indices are stored as `u8`.
pub const MAX_SHADES: u32 = 256;

/// Largest supported number of decimals in emitted coordinates.
pub const MAX_PRECISION: usize = 12;

/// Unit system declared in the G-code preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// `G20`, feeds in inches per minute.
    #[default]
    Inches,
    /// `G21`, feeds in millimetres per minute.
    Millimeters,
}

/// Configuration for one compilation run.
///
/// # Example
/// ```
/// use raster_burn::params::GenerationParameters;
/// let params = GenerationParameters::default();
/// assert_eq!(params.num_shades, 8);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// Plot origin X in absolute coordinates.
    pub origin_x: f64,
    /// Plot origin Y in absolute coordinates.
    pub origin_y: f64,
    /// Plot width.
    pub size_x: f64,
    /// Plot height.
    pub size_y: f64,
    /// Working grid columns.
    pub columns: u32,
    /// Working grid rows.
    pub rows: u32,
    /// Feed for the darkest shade (slowest, deepest burn).
    pub min_speed: f64,
    /// Feed for the lightest shade.
    pub max_speed: f64,
    /// Number of shades to quantize to.
    pub num_shades: u32,
    /// Unit system for coordinates and feeds.
    pub units: Units,
    /// Decimals written for each number in the output.
    pub precision: usize,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            size_x: 5.0,
            size_y: 5.0,
            columns: 32,
            rows: 32,
            min_speed: 10.0,
            max_speed: 30.0,
            num_shades: 8,
            units: Units::Inches,
            precision: 4,
        }
    }
}

impl GenerationParameters {
    /// Parse parameters from TOML text. Missing fields take their defaults.
    ///
    /// Values are not validated here, so overrides can still be applied
    /// before compiling.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load parameters from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check every field. Called before any processing begins.
    pub fn validate(&self) -> Result<()> {
        if self.columns < 2 || self.rows < 2 {
            return Err(BurnError::InvalidDimensions {
                width: self.columns,
                height: self.rows,
            });
        }
        validate_shades(self.num_shades)?;

        let finite = [
            ("origin_x", self.origin_x),
            ("origin_y", self.origin_y),
            ("size_x", self.size_x),
            ("size_y", self.size_y),
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(BurnError::InvalidParameter(format!(
                "{name} must be finite, got {value}"
            )));
        }

        if self.precision > MAX_PRECISION {
            return Err(BurnError::InvalidParameter(format!(
                "precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            )));
        }

        Ok(())
    }
}

/// Reject shade counts the quantizer cannot represent.
pub(crate) fn validate_shades(num_shades: u32) -> Result<()> {
    if !(2..=MAX_SHADES).contains(&num_shades) {
        return Err(BurnError::InvalidParameter(format!(
            "shade count must be within 2..={MAX_SHADES}, got {num_shades}"
        )));
    }
    Ok(())
}
