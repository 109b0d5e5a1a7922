use thiserror::Error;

use crate::converters::pptx::ConversionError;

/// Represents errors surfaced by the crate's top-level entry points.
#[derive(Error, Debug)]
pub enum SvgSlidesError {
    /// Error raised while translating a document into shapes.
    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// The conversion options could not be (de)serialized.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// An I/O error occurred, typically while reading an SVG or options file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A type alias for `Result<T, SvgSlidesError>` for convenience within the crate.
pub type Result<T> = std::result::Result<T, SvgSlidesError>;
