//! Resolves `translate` and `rotate` transforms into an absolute offset and a rotation.
//!
//! Only those two transform functions are understood. `scale`, `matrix` and the skews are
//! ignored without raising an error.

use log::debug;

use super::constants::ANGLE_UNITS_PER_DEGREE;
use super::utils::parse_number_list;
use crate::models::source::{ElementId, SourceDocument};

/// One function of an SVG `transform` list.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformFunction {
    Translate { dx: f64, dy: f64 },
    /// Rotation in degrees. An explicit rotation centre is ignored.
    Rotate(f64),
    /// Any other function (`scale`, `matrix`, `skewX`, ...), kept only for logging.
    Unsupported(String),
}

/// Offset (source units) and rotation (60000ths of a degree) applied to one element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedTransform {
    pub dx: f64,
    pub dy: f64,
    pub rotation: Option<i64>,
}

/// Parses a transform list such as `"translate(10, 20) rotate(45)"`.
/// Parsing stops at the first function without a closing parenthesis.
pub fn parse_transform_list(input: &str) -> Vec<TransformFunction> {
    let mut functions = Vec::new();
    let mut rest = input.trim();

    while !rest.is_empty() {
        let Some(open) = rest.find('(') else { break };
        let Some(close) = rest[open + 1..].find(')') else {
            break;
        };
        let name = rest[..open].trim_matches(|c: char| c.is_whitespace() || c == ',');
        let args = parse_number_list(&rest[open + 1..open + 1 + close]);

        let function = match name {
            "translate" => TransformFunction::Translate {
                dx: args.first().copied().unwrap_or(0.0),
                dy: args.get(1).copied().unwrap_or(0.0),
            },
            "rotate" => TransformFunction::Rotate(args.first().copied().unwrap_or(0.0)),
            other => TransformFunction::Unsupported(other.to_string()),
        };
        functions.push(function);
        rest = rest[open + 1 + close + 1..].trim_start();
    }
    functions
}

/// Sum of every `translate` in a transform list, or `None` if there is none.
fn translation_of(transform: &str) -> Option<(f64, f64)> {
    parse_transform_list(transform)
        .into_iter()
        .fold(None, |acc, function| match function {
            TransformFunction::Translate { dx, dy } => {
                let (x, y) = acc.unwrap_or((0.0, 0.0));
                Some((x + dx, y + dy))
            }
            TransformFunction::Unsupported(name) => {
                debug!("Ignoring unsupported transform '{}'", name);
                acc
            }
            TransformFunction::Rotate(_) => acc,
        })
}

/// First `rotate` angle of a transform list, in degrees.
fn rotation_of(transform: &str) -> Option<f64> {
    parse_transform_list(transform)
        .into_iter()
        .find_map(|function| match function {
            TransformFunction::Rotate(degrees) => Some(degrees),
            _ => None,
        })
}

/// Converts degrees to the 60000ths-of-a-degree unit used by `<a:xfrm rot="...">`.
pub fn degrees_to_angle_units(degrees: f64) -> i64 {
    (degrees * ANGLE_UNITS_PER_DEGREE).round() as i64
}

/// Resolves the offset and rotation of an element.
///
/// Translation is narrow: when the element declares its own `translate`, it
/// is combined with the nearest translating ancestor only. Otherwise the nearest and
/// next-nearest translating ancestors are summed. Rotation is read from the element's own
/// `transform` attribute only.
///
/// # Arguments
/// * `doc` - The source document.
/// * `id` - The element being converted.
pub fn resolve_transform(doc: &SourceDocument, id: ElementId) -> ResolvedTransform {
    let own = doc.get(id).attribute("transform");

    let mut ancestor_offsets = doc
        .ancestors(id)
        .filter_map(|ancestor| doc.get(ancestor).attribute("transform"))
        .filter_map(translation_of);

    let (dx, dy) = match own.and_then(translation_of) {
        Some((x, y)) => {
            let (ax, ay) = ancestor_offsets.next().unwrap_or((0.0, 0.0));
            (x + ax, y + ay)
        }
        None => {
            let (nx, ny) = ancestor_offsets.next().unwrap_or((0.0, 0.0));
            let (mx, my) = ancestor_offsets.next().unwrap_or((0.0, 0.0));
            (nx + mx, ny + my)
        }
    };

    let rotation = own.and_then(rotation_of).map(degrees_to_angle_units);

    ResolvedTransform { dx, dy, rotation }
}
