use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during the SVG to slide shape conversion process.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Formatting error during markup generation: {0}")]
    FormatError(#[from] std::fmt::Error),
    #[error("Source document is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Declared source size must be positive and finite, got {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("Unrecognized color token: '{0}'")]
    UnresolvedColor(String),
    #[error("Malformed path data: {0}")]
    MalformedPath(String),
    #[error("Shape identifiers exhausted")]
    ShapeIdsExhausted,
}

/// A specialized Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;

/// A recoverable, element-level problem met during conversion.
/// The affected element is either emitted with a fallback or skipped; the rest of the
/// document is still converted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionWarning {
    /// Tag of the element the warning belongs to.
    pub tag: String,
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    /// A color token could not be resolved; black was used instead.
    UnresolvedColor,
    /// The path data could not be interpreted; the element was not emitted.
    MalformedPath,
    /// A path command outside the supported set was skipped.
    UnsupportedPathCommand,
}
