use serde::{Deserialize, Serialize};

/// A point in destination space, expressed in EMU (English Metric Units).
/// 1 EMU = 1/914400 inch = 1/360000 cm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// One drawing instruction of a custom geometry path.
/// Every point has already been run through the coordinate mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "op")]
pub enum DrawingOp {
    /// Starts a new figure at the given point (`<a:moveTo>`).
    MoveTo(Point),
    /// Straight segment to the given point (`<a:lnTo>`).
    LineTo(Point),
    /// Cubic Bézier segment (`<a:cubicBezTo>`).
    CubicBezierTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Elliptical arc continuing from the current pen position (`<a:arcTo>`).
    ArcTo {
        /// Horizontal radius in EMU.
        width_radius: i64,
        /// Vertical radius in EMU.
        height_radius: i64,
        /// Start angle in 60000ths of a degree.
        start_angle: i64,
        /// Swing angle in 60000ths of a degree; negative values run counter-clockwise.
        swing_angle: i64,
    },
    /// Closes the current figure (`<a:close/>`).
    Close,
}

/// The geometry of a freeform shape: a single `<a:path>` inside `<a:custGeom>`.
///
/// `width`/`height` define the path coordinate space. The converter always makes them
/// equal to the shape extent so path points land on slide coordinates unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomGeometry {
    pub width: i64,
    pub height: i64,
    pub ops: Vec<DrawingOp>,
}
