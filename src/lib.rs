//! Converts SVG drawings into presentation slide shapes.
//!
//! The converter lives in [`converters::pptx`]; this module re-exports the common entry
//! points and exposes the conversion to JavaScript through `wasm-bindgen`.

pub mod config;
pub mod converters;
pub mod errors;
pub mod models;

pub use config::ConversionOptions;
pub use converters::pptx::{
    convert_svg_to_shape_tree, ConversionReport, Converter, ConverterBuilder, ShapeContainer,
    ShapeTree,
};
pub use errors::{Result, SvgSlidesError};

use std::path::Path;

use wasm_bindgen::prelude::*;

/// Reads an SVG file and converts it into a shape tree.
///
/// # Arguments
/// * `path` - Path of the SVG file.
/// * `options` - Conversion settings.
pub fn convert_svg_file(
    path: impl AsRef<Path>,
    options: &ConversionOptions,
) -> Result<(ShapeTree, ConversionReport)> {
    let svg = std::fs::read_to_string(path)?;
    Ok(convert_svg_to_shape_tree(&svg, options)?)
}

/// Converts an SVG document into `<p:spTree>` markup.
///
/// # Arguments
/// * `svg` - The SVG document as text.
/// * `width` - Declared width of the drawing, if known.
/// * `height` - Declared height of the drawing, if known.
#[wasm_bindgen]
pub fn svg_to_sp_tree(
    svg: &str,
    width: Option<f64>,
    height: Option<f64>,
) -> std::result::Result<String, JsValue> {
    let options = ConversionOptions {
        width,
        height,
        ..Default::default()
    };
    let (tree, report) =
        convert_svg_to_shape_tree(svg, &options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    for warning in &report.warnings {
        log::warn!("<{}>: {}", warning.tag, warning.message);
    }
    tree.to_xml().map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Routes `log` output to the browser console and installs the panic hook.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_logging() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A second call finds the logger already installed.
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        log::debug!("Console logger not installed: {}", e);
    }
}
