//! Defines constants used throughout the SVG to slide conversion process.

// Conversion factors
pub const PT_PER_INCH: f64 = 72.0;
pub const EMU_PER_INCH: f64 = 914400.0;
// EMU (English Metric Unit) per Point (standard 72 DPI)
pub const EMU_PER_PT: f64 = EMU_PER_INCH / PT_PER_INCH; // 12700

// Destination canvas extents in EMU.
pub const DEFAULT_CANVAS_WIDTH_EMU: i64 = 9_999_999;
pub const DEFAULT_CANVAS_HEIGHT_EMU: i64 = 7_777_777;

// Declared source size used when the caller gives neither width nor height.
pub const DEFAULT_SOURCE_WIDTH: f64 = 940.0;

// Angles are written in 60000ths of a degree.
pub const ANGLE_UNITS_PER_DEGREE: f64 = 60000.0;

// Freeform shapes are sized to a fixed nominal box of this many source units.
pub const NOMINAL_PATH_EXTENT: f64 = 100_000.0;

// Shape id 1 is taken by the spTree group itself.
pub const SHAPE_TREE_GROUP_ID: u32 = 1;
pub const DEFAULT_FIRST_SHAPE_ID: u32 = 2;

// Text defaults
pub const DEFAULT_FONT_SIZE_HUNDREDTHS: u32 = 1600; // 16pt
pub const FONT_SIZE_SCALE: f64 = 100.0; // font-size value -> hundredths of a point
pub const TEXT_AUTOFIT_FONT_SCALE: u32 = 62500;
pub const TEXT_AUTOFIT_LINE_SPACING_REDUCTION: u32 = 20000;
pub const TEXT_LANGUAGE: &str = "en-US";

// Markup namespaces
pub const NS_PRESENTATIONML: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const NS_DRAWINGML: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
