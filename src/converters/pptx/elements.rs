//! Handles the conversion of recognised SVG elements (`circle`, `ellipse`, `rect`, `line`,
//! `path`, `text`) into slide shapes.
//!
//! Each kind computes its own geometry; fill, outline and rotation are then applied by one
//! shared step so every shape goes through the same attribute policy.

use log::{debug, warn};

use super::{
    constants::*,
    coords::CoordinateMapper,
    error::{ConversionWarning, Result, WarningKind},
    path::interpret_path,
    style::{
        derive_shape_paint, derive_text_paint, resolve_effective_attributes, EffectiveAttributes,
    },
    transform::{resolve_transform, ResolvedTransform},
    utils::{parse_leading_number, parse_length},
};
use crate::config::ConversionOptions;
use crate::models::{
    geometry::CustomGeometry,
    shape::{
        Frame, HorizontalAlignment, Paint, ShapeKind, ShapeNode, Stroke, TextRun, VerticalAnchor,
    },
    source::{ElementId, SourceDocument, SourceElement},
};

/// The source element kinds that produce a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Circle,
    Ellipse,
    Rect,
    Line,
    Path,
    Text,
}

impl ElementKind {
    /// Matches a tag name (case-sensitive) against the recognised set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "circle" => Some(ElementKind::Circle),
            "ellipse" => Some(ElementKind::Ellipse),
            "rect" => Some(ElementKind::Rect),
            "line" => Some(ElementKind::Line),
            "path" => Some(ElementKind::Path),
            "text" => Some(ElementKind::Text),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Circle => "circle",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Rect => "rect",
            ElementKind::Line => "line",
            ElementKind::Path => "path",
            ElementKind::Text => "text",
        }
    }
}

/// A fully resolved shape that has not been given an identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDraft {
    pub kind: ShapeKind,
    pub frame: Frame,
    pub fill: Option<Paint>,
    pub stroke: Option<Stroke>,
    pub text: Option<TextRun>,
}

impl ShapeDraft {
    fn new(kind: ShapeKind, frame: Frame) -> Self {
        Self {
            kind,
            frame,
            fill: None,
            stroke: None,
            text: None,
        }
    }

    /// Finalizes the draft with its identifier and default display name.
    pub fn into_node(self, id: u32) -> ShapeNode {
        ShapeNode {
            id,
            name: format!("{} {}", self.kind.name_prefix(), id),
            kind: self.kind,
            frame: self.frame,
            fill: self.fill,
            stroke: self.stroke,
            text: self.text,
        }
    }
}

/// Shared, read-only state needed by every element handler.
pub(crate) struct EmitContext<'a> {
    pub doc: &'a SourceDocument,
    pub mapper: &'a CoordinateMapper,
    pub options: &'a ConversionOptions,
}

/// Reads a geometry attribute from the element itself, defaulting to 0.
fn geometry_attr(element: &SourceElement, name: &str) -> f64 {
    element
        .attribute(name)
        .and_then(parse_length)
        .unwrap_or(0.0)
}

/// Converts one recognised element into a shape draft.
///
/// # Arguments
/// * `kind` - The element's kind, from [`ElementKind::from_tag`].
/// * `ctx` - Document, mapper and options.
/// * `id` - The element to convert.
/// * `warnings` - Receives recoverable problems (unresolved colors, skipped path commands).
///
/// # Returns
/// * `Ok(Some(draft))` for an emitted shape.
/// * `Ok(None)` when the element produces nothing (a `text` without text content).
/// * `Err(ConversionError::MalformedPath)` when a path cannot be interpreted; the caller
///   skips the element and continues with the rest of the document.
pub(crate) fn emit_shape(
    kind: ElementKind,
    ctx: &EmitContext<'_>,
    id: ElementId,
    warnings: &mut Vec<ConversionWarning>,
) -> Result<Option<ShapeDraft>> {
    let element = ctx.doc.get(id);
    let attrs = resolve_effective_attributes(ctx.doc, id);
    let transform = resolve_transform(ctx.doc, id);

    let mut draft = match kind {
        ElementKind::Circle => {
            let r = geometry_attr(element, "r");
            ellipse_draft(ctx.mapper, element, &transform, r, r)
        }
        ElementKind::Ellipse => {
            let rx = geometry_attr(element, "rx");
            let ry = geometry_attr(element, "ry");
            ellipse_draft(ctx.mapper, element, &transform, rx, ry)
        }
        ElementKind::Rect => rect_draft(ctx.mapper, element, &transform),
        ElementKind::Line => line_draft(ctx.mapper, element, &transform),
        ElementKind::Path => path_draft(ctx.mapper, element, &transform, warnings)?,
        ElementKind::Text => match text_draft(ctx, element, &attrs, &transform, warnings) {
            Some(draft) => draft,
            None => {
                debug!("Skipping text element {:?} without text content", id);
                return Ok(None);
            }
        },
    };

    if kind != ElementKind::Text {
        apply_paint(&mut draft, kind, &attrs, ctx.options, warnings);
    }
    draft.frame.rotation = transform.rotation;

    Ok(Some(draft))
}

// --- Geometry ---

fn ellipse_draft(
    mapper: &CoordinateMapper,
    element: &SourceElement,
    transform: &ResolvedTransform,
    rx: f64,
    ry: f64,
) -> ShapeDraft {
    let cx = geometry_attr(element, "cx") + transform.dx;
    let cy = geometry_attr(element, "cy") + transform.dy;
    let frame = Frame::new(
        mapper.map_x(cx - rx),
        mapper.map_y(cy - ry),
        mapper.map_x(2.0 * rx),
        mapper.map_y(2.0 * ry),
    );
    ShapeDraft::new(ShapeKind::Ellipse, frame)
}

fn rect_draft(
    mapper: &CoordinateMapper,
    element: &SourceElement,
    transform: &ResolvedTransform,
) -> ShapeDraft {
    let x = geometry_attr(element, "x") + transform.dx;
    let y = geometry_attr(element, "y") + transform.dy;
    let kind = if element.has_attribute("rx") && element.has_attribute("ry") {
        ShapeKind::RoundRect
    } else {
        ShapeKind::Rect
    };
    let frame = Frame::new(
        mapper.map_x(x),
        mapper.map_y(y),
        mapper.map_x(geometry_attr(element, "width")),
        mapper.map_y(geometry_attr(element, "height")),
    );
    ShapeDraft::new(kind, frame)
}

/// Lines are framed by the bounding box of their mapped endpoints. A line running
/// right-to-left or bottom-to-top is flipped so it keeps its direction.
fn line_draft(
    mapper: &CoordinateMapper,
    element: &SourceElement,
    transform: &ResolvedTransform,
) -> ShapeDraft {
    let x1 = mapper.map_x(geometry_attr(element, "x1") + transform.dx);
    let y1 = mapper.map_y(geometry_attr(element, "y1") + transform.dy);
    let x2 = mapper.map_x(geometry_attr(element, "x2") + transform.dx);
    let y2 = mapper.map_y(geometry_attr(element, "y2") + transform.dy);

    let mut frame = Frame::new(x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs());
    frame.flip_h = x2 < x1;
    frame.flip_v = y2 < y1;
    ShapeDraft::new(ShapeKind::Line, frame)
}

/// Paths become freeform shapes anchored at the slide origin with a fixed nominal extent.
/// The path coordinate space equals the extent, so drawing points are slide coordinates.
fn path_draft(
    mapper: &CoordinateMapper,
    element: &SourceElement,
    transform: &ResolvedTransform,
    warnings: &mut Vec<ConversionWarning>,
) -> Result<ShapeDraft> {
    let d = element.attribute("d").unwrap_or("");
    let interpretation = interpret_path(d, mapper, (transform.dx, transform.dy))?;

    for command in interpretation.skipped_commands {
        warnings.push(ConversionWarning {
            tag: element.tag.clone(),
            kind: WarningKind::UnsupportedPathCommand,
            message: format!("path command '{}' is not supported and was skipped", command),
        });
    }

    let width = mapper.map_x(NOMINAL_PATH_EXTENT);
    let height = mapper.map_y(NOMINAL_PATH_EXTENT);
    let geometry = CustomGeometry {
        width,
        height,
        ops: interpretation.ops,
    };
    Ok(ShapeDraft::new(
        ShapeKind::Freeform(geometry),
        Frame::new(0, 0, width, height),
    ))
}

// --- Text ---

/// Vertical anchor from `dominant-baseline`, falling back to the `dy` offset hint.
fn text_anchor(attrs: &EffectiveAttributes) -> VerticalAnchor {
    if let Some(baseline) = attrs.get("dominant-baseline") {
        return match baseline.trim() {
            "hanging" => VerticalAnchor::Top,
            _ => VerticalAnchor::Center,
        };
    }
    match attrs.get("dy").and_then(|dy| parse_leading_number(dy)) {
        Some((offset, _)) if offset > 0.5 => VerticalAnchor::Top,
        _ => VerticalAnchor::Center,
    }
}

fn text_alignment(attrs: &EffectiveAttributes) -> HorizontalAlignment {
    match attrs.get("text-anchor").map(|a| a.trim()) {
        Some("end") => HorizontalAlignment::Right,
        Some("middle") => HorizontalAlignment::Center,
        _ => HorizontalAlignment::Left,
    }
}

fn font_size(attrs: &EffectiveAttributes, default_size: u32) -> u32 {
    match attrs.get("font-size").and_then(|size| parse_length(size)) {
        Some(size) => (size * FONT_SIZE_SCALE).round().max(0.0) as u32,
        None => default_size,
    }
}

/// Builds a text box for a `text` element. Only the element's direct text is used.
///
/// # Returns
/// `None` when the element has no non-whitespace text.
fn text_draft(
    ctx: &EmitContext<'_>,
    element: &SourceElement,
    attrs: &EffectiveAttributes,
    transform: &ResolvedTransform,
    warnings: &mut Vec<ConversionWarning>,
) -> Option<ShapeDraft> {
    let text = element.text.as_deref().map(str::trim).filter(|t| !t.is_empty())?;

    let x = geometry_attr(element, "x") + transform.dx;
    let y = geometry_attr(element, "y") + transform.dy;

    let (color, unresolved) = derive_text_paint(attrs);
    if let Some(token) = unresolved {
        warnings.push(unresolved_color_warning(&element.tag, &token));
    }

    let mut draft = ShapeDraft::new(
        ShapeKind::TextBox,
        Frame::new(ctx.mapper.map_x(x), ctx.mapper.map_y(y), 0, 0),
    );
    draft.text = Some(TextRun {
        text: text.to_string(),
        size: font_size(attrs, ctx.options.default_font_size),
        bold: attrs.contains_key("font-weight"),
        color,
        alignment: text_alignment(attrs),
        anchor: text_anchor(attrs),
    });
    Some(draft)
}

// --- Shared attribute application ---

fn unresolved_color_warning(tag: &str, token: &str) -> ConversionWarning {
    ConversionWarning {
        tag: tag.to_string(),
        kind: WarningKind::UnresolvedColor,
        message: format!("color '{}' could not be resolved, black was used", token),
    }
}

/// Applies fill and outline to a non-text shape.
fn apply_paint(
    draft: &mut ShapeDraft,
    kind: ElementKind,
    attrs: &EffectiveAttributes,
    options: &ConversionOptions,
    warnings: &mut Vec<ConversionWarning>,
) {
    let paint = derive_shape_paint(attrs, kind == ElementKind::Line, options.stroke_width_scale);
    for token in &paint.unresolved {
        warn!("Element <{}> uses unresolved color '{}'", kind.tag(), token);
        warnings.push(unresolved_color_warning(kind.tag(), token));
    }
    draft.fill = paint.fill;
    draft.stroke = paint.stroke;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::pptx::error::ConversionError;
    use crate::models::colors::ResolvedColor;
    use crate::models::geometry::{DrawingOp, Point};

    struct Fixture {
        doc: SourceDocument,
        mapper: CoordinateMapper,
        options: ConversionOptions,
    }

    impl Fixture {
        fn new() -> Self {
            let options = ConversionOptions::default();
            let mapper = CoordinateMapper::new(
                None,
                None,
                options.canvas_width,
                options.canvas_height,
            )
            .unwrap();
            Self {
                doc: SourceDocument::new("svg"),
                mapper,
                options,
            }
        }

        fn add(&mut self, element: SourceElement) -> ElementId {
            let root = self.doc.root();
            self.doc.append_element(root, element)
        }

        fn emit(&self, id: ElementId) -> (Result<Option<ShapeDraft>>, Vec<ConversionWarning>) {
            let ctx = EmitContext {
                doc: &self.doc,
                mapper: &self.mapper,
                options: &self.options,
            };
            let kind = ElementKind::from_tag(&self.doc.get(id).tag).unwrap();
            let mut warnings = Vec::new();
            let result = emit_shape(kind, &ctx, id, &mut warnings);
            (result, warnings)
        }

        fn draft(&self, id: ElementId) -> ShapeDraft {
            self.emit(id).0.unwrap().unwrap()
        }
    }

    #[test]
    fn test_from_tag_is_case_sensitive() {
        assert_eq!(ElementKind::from_tag("rect"), Some(ElementKind::Rect));
        assert_eq!(ElementKind::from_tag("Rect"), None);
        assert_eq!(ElementKind::from_tag("g"), None);
    }

    #[test]
    fn test_circle_bounding_box() {
        let mut f = Fixture::new();
        let (x, y, r) = (200.0, 150.0, 40.0);
        let id = f.add(
            SourceElement::new("circle")
                .with_attribute("cx", "200")
                .with_attribute("cy", "150")
                .with_attribute("r", "40"),
        );
        let draft = f.draft(id);
        assert_eq!(draft.kind, ShapeKind::Ellipse);
        assert_eq!(
            draft.frame,
            Frame::new(
                f.mapper.map_x(x - r),
                f.mapper.map_y(y - r),
                f.mapper.map_x(2.0 * r),
                f.mapper.map_y(2.0 * r)
            )
        );
    }

    #[test]
    fn test_rect_becomes_round_rect_only_with_both_radii() {
        let mut f = Fixture::new();
        let both = f.add(
            SourceElement::new("rect")
                .with_attribute("rx", "5")
                .with_attribute("ry", "5"),
        );
        let one = f.add(SourceElement::new("rect").with_attribute("rx", "5"));
        assert_eq!(f.draft(both).kind, ShapeKind::RoundRect);
        assert_eq!(f.draft(one).kind, ShapeKind::Rect);
    }

    #[test]
    fn test_rect_with_translated_group() {
        let mut f = Fixture::new();
        let root = f.doc.root();
        let g = f.doc.append_element(
            root,
            SourceElement::new("g").with_attribute("transform", "translate(10, 20)"),
        );
        let rect = f.doc.append_element(
            g,
            SourceElement::new("rect")
                .with_attribute("x", "5")
                .with_attribute("y", "5")
                .with_attribute("width", "50")
                .with_attribute("height", "30"),
        );
        let frame = f.draft(rect).frame;
        assert_eq!(frame.x, f.mapper.map_x(15.0));
        assert_eq!(frame.y, f.mapper.map_y(25.0));
        assert_eq!(frame.cx, f.mapper.map_x(50.0));
        assert_eq!(frame.cy, f.mapper.map_y(30.0));
    }

    #[test]
    fn test_line_frame_and_flip() {
        let mut f = Fixture::new();
        let id = f.add(
            SourceElement::new("line")
                .with_attribute("x1", "100")
                .with_attribute("y1", "10")
                .with_attribute("x2", "20")
                .with_attribute("y2", "80"),
        );
        let draft = f.draft(id);
        assert_eq!(draft.kind, ShapeKind::Line);
        assert_eq!(draft.frame.x, f.mapper.map_x(20.0));
        assert_eq!(draft.frame.y, f.mapper.map_y(10.0));
        assert_eq!(draft.frame.cx, f.mapper.map_x(100.0) - f.mapper.map_x(20.0));
        assert!(draft.frame.flip_h);
        assert!(!draft.frame.flip_v);
        // Lines get an outline but no fill by default.
        assert_eq!(draft.fill, None);
        assert!(draft.stroke.is_some());
    }

    #[test]
    fn test_path_uses_nominal_extent() {
        let mut f = Fixture::new();
        let id = f.add(SourceElement::new("path").with_attribute("d", "M0 0 L10 10 Z"));
        let draft = f.draft(id);
        let extent = (f.mapper.map_x(100_000.0), f.mapper.map_y(100_000.0));
        assert_eq!(draft.frame, Frame::new(0, 0, extent.0, extent.1));
        match draft.kind {
            ShapeKind::Freeform(geometry) => {
                assert_eq!((geometry.width, geometry.height), extent);
                assert_eq!(
                    geometry.ops,
                    vec![
                        DrawingOp::MoveTo(Point::new(0, 0)),
                        DrawingOp::LineTo(Point::new(f.mapper.map_x(10.0), f.mapper.map_y(10.0))),
                        DrawingOp::Close,
                    ]
                );
            }
            other => panic!("expected freeform, got {other:?}"),
        }
    }

    #[test]
    fn test_relative_path_in_translated_group() {
        let mut f = Fixture::new();
        let root = f.doc.root();
        let g = f.doc.append_element(
            root,
            SourceElement::new("g").with_attribute("transform", "translate(100,100)"),
        );
        let id = f
            .doc
            .append_element(g, SourceElement::new("path").with_attribute("d", "m10 10 l5 0"));
        match f.draft(id).kind {
            ShapeKind::Freeform(geometry) => assert_eq!(
                geometry.ops,
                vec![
                    DrawingOp::MoveTo(Point::new(f.mapper.map_x(110.0), f.mapper.map_y(110.0))),
                    DrawingOp::LineTo(Point::new(f.mapper.map_x(115.0), f.mapper.map_y(110.0))),
                ]
            ),
            other => panic!("expected freeform, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_path_is_an_error() {
        let mut f = Fixture::new();
        let id = f.add(SourceElement::new("path").with_attribute("d", "M0 0 L5"));
        let (result, _) = f.emit(id);
        assert!(matches!(result, Err(ConversionError::MalformedPath(_))));
    }

    #[test]
    fn test_skipped_path_commands_are_reported() {
        let mut f = Fixture::new();
        let id = f.add(SourceElement::new("path").with_attribute("d", "M0 0 H10 V10 z"));
        let (result, warnings) = f.emit(id);
        assert!(result.unwrap().is_some());
        assert_eq!(warnings.len(), 2);
        assert!(warnings
            .iter()
            .all(|w| w.kind == WarningKind::UnsupportedPathCommand));
    }

    #[test]
    fn test_text_run_properties() {
        let mut f = Fixture::new();
        let id = f.add(
            SourceElement::new("text")
                .with_attribute("x", "10")
                .with_attribute("y", "20")
                .with_attribute("font-size", "24")
                .with_attribute("font-weight", "bold")
                .with_attribute("text-anchor", "middle")
                .with_attribute("dominant-baseline", "hanging")
                .with_attribute("fill", "#336699")
                .with_attribute("transform", "rotate(90)")
                .with_text("Revenue"),
        );
        let draft = f.draft(id);
        assert_eq!(draft.kind, ShapeKind::TextBox);
        assert_eq!(
            draft.frame.clone(),
            Frame {
                rotation: Some(5_400_000),
                ..Frame::new(f.mapper.map_x(10.0), f.mapper.map_y(20.0), 0, 0)
            }
        );
        assert_eq!(draft.fill, None);
        assert_eq!(draft.stroke, None);

        let run = draft.text.unwrap();
        assert_eq!(run.text, "Revenue");
        assert_eq!(run.size, 2400);
        assert!(run.bold);
        assert_eq!(run.alignment, HorizontalAlignment::Center);
        assert_eq!(run.anchor, VerticalAnchor::Top);
        match run.color {
            Paint::Solid(c) => assert_eq!(c.rgb.to_hex(), "336699"),
            other => panic!("unexpected color {other:?}"),
        }
    }

    #[test]
    fn test_text_defaults() {
        let mut f = Fixture::new();
        let id = f.add(SourceElement::new("text").with_text("plain"));
        let run = f.draft(id).text.unwrap();
        assert_eq!(run.size, 1600);
        assert!(!run.bold);
        assert_eq!(run.alignment, HorizontalAlignment::Left);
        assert_eq!(run.anchor, VerticalAnchor::Center);
        assert_eq!(run.color, Paint::Solid(ResolvedColor::BLACK));
    }

    #[test]
    fn test_text_anchor_from_dy() {
        let mut f = Fixture::new();
        let top = f.add(
            SourceElement::new("text")
                .with_attribute("dy", "0.8em")
                .with_text("a"),
        );
        let centered = f.add(
            SourceElement::new("text")
                .with_attribute("dy", ".3em")
                .with_text("b"),
        );
        assert_eq!(f.draft(top).text.unwrap().anchor, VerticalAnchor::Top);
        assert_eq!(
            f.draft(centered).text.unwrap().anchor,
            VerticalAnchor::Center
        );
    }

    #[test]
    fn test_empty_text_is_not_emitted() {
        let mut f = Fixture::new();
        let empty = f.add(SourceElement::new("text"));
        let blank = f.add(SourceElement::new("text").with_text("   "));
        assert!(f.emit(empty).0.unwrap().is_none());
        assert!(f.emit(blank).0.unwrap().is_none());
    }

    #[test]
    fn test_unresolved_color_is_reported_and_recovered() {
        let mut f = Fixture::new();
        let id = f.add(SourceElement::new("ellipse").with_attribute("fill", "url(#paint0)"));
        let (result, warnings) = f.emit(id);
        let draft = result.unwrap().unwrap();
        assert_eq!(draft.fill, Some(Paint::Solid(ResolvedColor::BLACK)));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::UnresolvedColor);
        assert_eq!(warnings[0].tag, "ellipse");
    }

    #[test]
    fn test_into_node_names() {
        let draft = ShapeDraft::new(ShapeKind::Rect, Frame::default());
        assert_eq!(draft.into_node(7).name, "Shape 7");
        let freeform = ShapeDraft::new(
            ShapeKind::Freeform(CustomGeometry {
                width: 1,
                height: 1,
                ops: Vec::new(),
            }),
            Frame::default(),
        );
        assert_eq!(freeform.into_node(8).name, "Freeform 8");
    }
}
