//! Linear mapping from source document units to destination EMU.

use super::constants::DEFAULT_SOURCE_WIDTH;
use super::error::{ConversionError, Result};

/// Maps source coordinates onto the fixed destination canvas.
///
/// `map_x(v) = round(v * canvas_width / width)` and likewise for `y`. Values are never
/// clamped: negative or out-of-canvas coordinates propagate unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    source_width: f64,
    source_height: f64,
    canvas_width: i64,
    canvas_height: i64,
}

impl CoordinateMapper {
    /// Creates a mapper from the declared source size.
    ///
    /// Missing dimensions are derived with a 4:3 aspect ratio: with neither given the source
    /// is 940 wide, `height = width * 3/4` when only the width is known, and
    /// `width = height * 4/3` when only the height is known.
    ///
    /// # Returns
    /// `ConversionError::InvalidDimensions` if a resulting dimension is not positive and finite.
    pub fn new(
        width: Option<f64>,
        height: Option<f64>,
        canvas_width: i64,
        canvas_height: i64,
    ) -> Result<Self> {
        let (source_width, source_height) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * 3.0 / 4.0),
            (None, Some(h)) => (h * 4.0 / 3.0, h),
            (None, None) => (DEFAULT_SOURCE_WIDTH, DEFAULT_SOURCE_WIDTH * 3.0 / 4.0),
        };

        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(source_width) || !valid(source_height) {
            return Err(ConversionError::InvalidDimensions {
                width: source_width,
                height: source_height,
            });
        }

        Ok(Self {
            source_width,
            source_height,
            canvas_width,
            canvas_height,
        })
    }

    pub fn source_width(&self) -> f64 {
        self.source_width
    }

    pub fn source_height(&self) -> f64 {
        self.source_height
    }

    /// Maps a horizontal source coordinate or length to EMU.
    pub fn map_x(&self, v: f64) -> i64 {
        (v * self.canvas_width as f64 / self.source_width).round() as i64
    }

    /// Maps a vertical source coordinate or length to EMU.
    pub fn map_y(&self, v: f64) -> i64 {
        (v * self.canvas_height as f64 / self.source_height).round() as i64
    }
}
