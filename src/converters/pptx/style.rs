//! Resolves the effective visual attributes of an element and derives its paints.
//!
//! Attributes come from three places: the element's plain attributes, its inline `style`
//! declarations, and (when the direct parent is a `<g>`) the parent's attributes and inline
//! style. They are flattened into one `EffectiveAttributes` map per element.

use log::{debug, warn};

use super::colors::resolve_color;
use crate::models::{
    colors::ResolvedColor,
    shape::{Paint, Stroke},
    source::{AttributeMap, ElementId, SourceDocument, SourceElement},
};

use super::utils::parse_length;

/// Tag of the grouping container whose attributes are merged into its children.
pub const GROUP_TAG: &str = "g";

/// Flattened attribute mapping for one element. Built fresh per element, never shared.
pub type EffectiveAttributes = AttributeMap;

/// Parses an inline declaration list (`"key: value; key: value"`).
///
/// Whitespace around separators is insignificant and empty segments (including a trailing
/// `;`) are ignored. Segments without a `:` are dropped.
pub fn parse_inline_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| match segment.split_once(':') {
            Some((key, value)) => Some((key.trim().to_string(), value.trim().to_string())),
            None => {
                debug!("Ignoring style declaration without ':': '{}'", segment);
                None
            }
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Overlays an element's plain attributes and then its inline style onto `target`.
fn overlay_element(target: &mut EffectiveAttributes, element: &SourceElement) {
    for (key, value) in &element.attributes {
        target.insert(key.clone(), value.clone());
    }
    if let Some(style) = &element.style {
        target.extend(parse_inline_style(style));
    }
}

/// Merges an element's attributes with those of its direct parent.
///
/// Merge order: own plain attributes, then own inline style (style wins on collision),
/// then, if `parent` is a `<g>`, the parent's plain attributes and inline style. The
/// parent is applied last, so a group's attribute overrides the same attribute on the child.
///
/// # Arguments
/// * `element` - The element being converted.
/// * `parent` - Its direct parent, if any. Only `<g>` parents contribute.
pub fn merge_attributes(
    element: &SourceElement,
    parent: Option<&SourceElement>,
) -> EffectiveAttributes {
    let mut merged = EffectiveAttributes::new();
    overlay_element(&mut merged, element);

    if let Some(group) = parent.filter(|p| p.tag == GROUP_TAG) {
        overlay_element(&mut merged, group);
    }
    merged
}

/// Convenience wrapper around [`merge_attributes`] for an element of a `SourceDocument`.
pub fn resolve_effective_attributes(doc: &SourceDocument, id: ElementId) -> EffectiveAttributes {
    merge_attributes(doc.get(id), doc.parent_element(id))
}

// --- Paint Derivation ---

/// Fill and line paints derived for one shape, plus any color tokens that had to fall back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapePaint {
    pub fill: Option<Paint>,
    pub stroke: Option<Stroke>,
    /// Color tokens that could not be resolved and were replaced with black.
    pub unresolved: Vec<String>,
}

/// Resolves the paint named by `color_key`, if present.
/// `"none"` gives `Paint::None`. The more specific `*-opacity` attribute is preferred over
/// the generic `opacity` one.
fn resolve_paint(
    attrs: &EffectiveAttributes,
    color_key: &str,
    opacity_key: &str,
    unresolved: &mut Vec<String>,
) -> Option<Paint> {
    let token = attrs.get(color_key)?.trim();
    if token == "none" {
        return Some(Paint::None);
    }
    let opacity = attrs
        .get(opacity_key)
        .or_else(|| attrs.get("opacity"))
        .map(String::as_str);

    match resolve_color(token, opacity) {
        Ok(color) => Some(Paint::Solid(color)),
        Err(e) => {
            warn!("{}; falling back to black", e);
            unresolved.push(token.to_string());
            Some(Paint::Solid(ResolvedColor::BLACK))
        }
    }
}

/// Derives the fill and outline of a non-text shape from its effective attributes.
///
/// Policy:
/// * no `fill`: solid black fill, except a line which gets no fill and a black outline
///   (unless a `stroke` is given);
/// * `fill` color and no `stroke`: black outline at default width, except for lines;
/// * `fill="none"` and no `stroke`: no outline;
/// * `stroke="none"`: explicit no-outline;
/// * `stroke` color: solid outline, with `width = stroke-width * stroke_width_scale` when
///   `stroke-width` is present, otherwise the default width.
///
/// # Arguments
/// * `attrs` - The element's effective attributes.
/// * `is_line` - Whether the element is a `<line>`.
/// * `stroke_width_scale` - EMU per source unit of `stroke-width`.
pub fn derive_shape_paint(
    attrs: &EffectiveAttributes,
    is_line: bool,
    stroke_width_scale: f64,
) -> ShapePaint {
    let mut unresolved = Vec::new();
    let black_outline = Stroke {
        paint: Paint::Solid(ResolvedColor::BLACK),
        width: None,
    };

    let fill = resolve_paint(attrs, "fill", "fill-opacity", &mut unresolved);
    let stroke_paint = resolve_paint(attrs, "stroke", "stroke-opacity", &mut unresolved);

    let stroke = match stroke_paint {
        Some(Paint::None) => Some(Stroke {
            paint: Paint::None,
            width: None,
        }),
        Some(paint) => {
            let width = attrs
                .get("stroke-width")
                .and_then(|value| parse_length(value))
                .map(|w| (w * stroke_width_scale).round() as i64);
            Some(Stroke { paint, width })
        }
        None => match (fill, is_line) {
            (Some(Paint::Solid(_)), false) => Some(black_outline),
            (Some(_), _) => None,
            (None, false) => None,
            (None, true) => Some(black_outline),
        },
    };

    let fill = match fill {
        Some(paint) => Some(paint),
        None if is_line => None,
        None => Some(Paint::Solid(ResolvedColor::BLACK)),
    };

    ShapePaint {
        fill,
        stroke,
        unresolved,
    }
}

/// Derives the color of a text run from `fill`, defaulting to black.
///
/// # Returns
/// The run paint and the color token that failed to resolve, if any.
pub fn derive_text_paint(attrs: &EffectiveAttributes) -> (Paint, Option<String>) {
    let mut unresolved = Vec::new();
    let paint = resolve_paint(attrs, "fill", "fill-opacity", &mut unresolved)
        .unwrap_or(Paint::Solid(ResolvedColor::BLACK));
    (paint, unresolved.pop())
}
