use serde::{Deserialize, Serialize};

use super::colors::ResolvedColor;
use super::geometry::CustomGeometry;

/// The kind of an emitted shape.
/// Preset kinds map to `<a:prstGeom prst="...">`; `Freeform` carries its own `<a:custGeom>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    /// Ellipse shape (from `circle` and `ellipse`).
    Ellipse,
    /// Rectangle shape.
    Rect,
    /// Round corner rectangle shape (a `rect` carrying both `rx` and `ry`).
    RoundRect,
    /// Straight connector line.
    Line,
    /// Custom geometry built from a path's drawing operations.
    Freeform(CustomGeometry),
    /// Rectangle used as a text container.
    TextBox,
}

impl ShapeKind {
    /// The DrawingML preset geometry name, or `None` for custom geometry.
    pub fn preset_name(&self) -> Option<&'static str> {
        match self {
            ShapeKind::Ellipse => Some("ellipse"),
            ShapeKind::Rect | ShapeKind::TextBox => Some("rect"),
            ShapeKind::RoundRect => Some("roundRect"),
            ShapeKind::Line => Some("line"),
            ShapeKind::Freeform(_) => None,
        }
    }

    /// Prefix used for the default display name (`Shape 3`, `Freeform 4`).
    pub fn name_prefix(&self) -> &'static str {
        match self {
            ShapeKind::Freeform(_) => "Freeform",
            _ => "Shape",
        }
    }
}

/// Position, extent and orientation of a shape (`<a:xfrm>`), in EMU.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
    /// Clockwise rotation in 60000ths of a degree.
    pub rotation: Option<i64>,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Frame {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self {
            x,
            y,
            cx,
            cy,
            ..Default::default()
        }
    }
}

/// A fill or line paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Paint {
    /// Explicitly unpainted (`<a:noFill/>`).
    None,
    /// Solid color with opacity (`<a:solidFill>`).
    Solid(ResolvedColor),
}

/// The outline of a shape (`<a:ln>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub paint: Paint,
    /// Line width in EMU. `None` leaves the application default width.
    pub width: Option<i64>,
}

/// Horizontal paragraph alignment (`<a:pPr algn="...">`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
}

impl HorizontalAlignment {
    pub fn as_attr(&self) -> &'static str {
        match self {
            HorizontalAlignment::Left => "l",
            HorizontalAlignment::Center => "ctr",
            HorizontalAlignment::Right => "r",
        }
    }
}

/// Vertical anchoring of the text body (`<a:bodyPr anchor="...">`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAnchor {
    Top,
    Center,
}

impl VerticalAnchor {
    pub fn as_attr(&self) -> &'static str {
        match self {
            VerticalAnchor::Top => "t",
            VerticalAnchor::Center => "ctr",
        }
    }
}

/// A single run of text inside a text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub text: String,
    /// Font size in hundredths of a point.
    pub size: u32,
    pub bold: bool,
    pub color: Paint,
    pub alignment: HorizontalAlignment,
    pub anchor: VerticalAnchor,
}

/// A shape ready to be appended to a slide's shape tree (`<p:sp>`).
/// Created once per source element and never mutated after being appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeNode {
    /// Unique identifier within the slide (`cNvPr id`).
    pub id: u32,
    /// Display name (`cNvPr name`).
    pub name: String,
    pub kind: ShapeKind,
    pub frame: Frame,
    /// `None` means no fill element is written and the application default applies.
    pub fill: Option<Paint>,
    /// `None` means no `<a:ln>` element is written.
    pub stroke: Option<Stroke>,
    pub text: Option<TextRun>,
}
