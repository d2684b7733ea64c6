use thiserror::Error;

/// Errors raised while compiling an image into a toolpath.
#[derive(Error, Debug)]
pub enum BurnError {
    /// A parameter is outside its valid range. Raised before any processing starts.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Target or grid dimensions that cannot be worked with.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Image decode or encode failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// File read or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, BurnError>;
