//! Converts SVG drawings into the shape tree of a presentation slide
//! (PresentationML `<p:spTree>` with DrawingML geometry).
//!
//! The entry point is `convert_svg_to_shape_tree`; a reusable `Converter` built with
//! `ConverterBuilder` is available when shape ids must keep increasing across documents.
//!
//! # Current Features & Limitations:
//! *   Converts `circle`, `ellipse`, `rect`, `line`, `path` and `text` elements.
//! *   Path commands `M`, `L`, `C`, `A`, `Z` (absolute and relative). `H`, `V`, `S`, `Q`, `T`
//! are skipped with a warning.
//! *   Fill, stroke, stroke width and opacity from attributes, inline style and the direct
//! parent group.
//! *   `translate` and `rotate` transforms. `scale`, `matrix` and skews are ignored.
//! *   No gradients, patterns, clipping, masks, markers or `tspan` text runs.

pub mod constants;
mod colors;
mod coords;
mod elements;
mod error;
mod markup;
mod path;
mod structure;
mod style;
mod transform;
mod utils;

pub use colors::resolve_color;
pub use coords::CoordinateMapper;
pub use elements::ElementKind;
pub use error::{ConversionError, ConversionWarning, Result, WarningKind};
pub use markup::write_shape;
pub use path::{interpret_path, PathInterpretation};
pub use structure::{
    ConversionReport, Converter, ConverterBuilder, ShapeContainer, ShapeIdCounter, ShapeTree,
};
pub use style::{parse_inline_style, resolve_effective_attributes};
pub use transform::{resolve_transform, ResolvedTransform};

use crate::config::ConversionOptions;

/// Converts an SVG document into a slide shape tree.
///
/// # Arguments
/// * `svg` - The SVG document as text.
/// * `options` - Conversion settings (declared size, canvas, defaults).
///
/// # Returns
/// The shape tree and a report of the shapes emitted and the per-element warnings, or a
/// `ConversionError` when the document is not well-formed or the declared size is invalid.
pub fn convert_svg_to_shape_tree(
    svg: &str,
    options: &ConversionOptions,
) -> Result<(ShapeTree, ConversionReport)> {
    let mut converter = ConverterBuilder::new()
        .set_options(options.clone())
        .build()?;
    let mut tree = ShapeTree::new();
    let report = converter.convert_str(svg, &mut tree)?;
    Ok((tree, report))
}
