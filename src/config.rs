//! Conversion settings.
//!
//! Options can be built in code or loaded from JSON. Every field has a default, so an empty
//! JSON object (`{}`) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::converters::pptx::constants::{
    DEFAULT_CANVAS_HEIGHT_EMU, DEFAULT_CANVAS_WIDTH_EMU, DEFAULT_FIRST_SHAPE_ID,
    DEFAULT_FONT_SIZE_HUNDREDTHS, EMU_PER_PT,
};
use crate::errors::Result;

/// Settings accepted by the converter entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionOptions {
    /// Declared width of the source document, in source units.
    pub width: Option<f64>,
    /// Declared height of the source document, in source units.
    pub height: Option<f64>,
    /// Destination canvas width in EMU.
    pub canvas_width: i64,
    /// Destination canvas height in EMU.
    pub canvas_height: i64,
    /// EMU per source unit of `stroke-width`.
    pub stroke_width_scale: f64,
    /// Identifier given to the first emitted shape.
    pub first_shape_id: u32,
    /// Text size used when `font-size` is absent, in hundredths of a point.
    pub default_font_size: u32,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            canvas_width: DEFAULT_CANVAS_WIDTH_EMU,
            canvas_height: DEFAULT_CANVAS_HEIGHT_EMU,
            stroke_width_scale: EMU_PER_PT,
            first_shape_id: DEFAULT_FIRST_SHAPE_ID,
            default_font_size: DEFAULT_FONT_SIZE_HUNDREDTHS,
        }
    }
}

impl ConversionOptions {
    /// Parses options from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON options file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_defaults() {
        let options = ConversionOptions::from_json_str("{}").unwrap();
        assert_eq!(options, ConversionOptions::default());
        assert_eq!(options.stroke_width_scale, 12700.0);
    }

    #[test]
    fn test_partial_json_overrides_fields() {
        let options =
            ConversionOptions::from_json_str(r#"{"width": 800, "canvasWidth": 9144000}"#).unwrap();
        assert_eq!(options.width, Some(800.0));
        assert_eq!(options.height, None);
        assert_eq!(options.canvas_width, 9_144_000);
        assert_eq!(options.canvas_height, DEFAULT_CANVAS_HEIGHT_EMU);
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        let err = ConversionOptions::from_json_str("{width: }").unwrap_err();
        assert!(matches!(err, crate::errors::SvgSlidesError::Config(_)));
    }
}
