//! Handles the overall structure of the conversion: the converter and its builder, shape
//! id allocation, the depth-first walk over the source document and the output containers.

use log::{debug, info, warn};
use serde::Serialize;

use super::{
    coords::CoordinateMapper,
    elements::{emit_shape, ElementKind, EmitContext},
    error::{ConversionError, ConversionWarning, Result, WarningKind},
};
use crate::config::ConversionOptions;
use crate::models::{shape::ShapeNode, source::SourceDocument};

// --- Output containers ---

/// Receives shapes in emission order.
pub trait ShapeContainer {
    fn append_shape(&mut self, shape: ShapeNode);
}

impl ShapeContainer for Vec<ShapeNode> {
    fn append_shape(&mut self, shape: ShapeNode) {
        self.push(shape);
    }
}

/// The shape tree of one slide. Rendered to `<p:spTree>` markup by [`ShapeTree::to_xml`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeTree {
    shapes: Vec<ShapeNode>,
}

impl ShapeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[ShapeNode] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn into_shapes(self) -> Vec<ShapeNode> {
        self.shapes
    }
}

impl ShapeContainer for ShapeTree {
    fn append_shape(&mut self, shape: ShapeNode) {
        self.shapes.push(shape);
    }
}

// --- Shape ids ---

/// Hands out shape identifiers. Each call to [`ShapeIdCounter::next_id`] returns a fresh id.
/// Once `u32::MAX` has been handed out the counter is exhausted and refuses further ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeIdCounter {
    next: Option<u32>,
}

impl ShapeIdCounter {
    pub fn new(first: u32) -> Self {
        Self { next: Some(first) }
    }

    /// The id the next emitted shape will receive, or `None` when exhausted.
    pub fn peek(&self) -> Option<u32> {
        self.next
    }

    /// # Returns
    /// `ConversionError::ShapeIdsExhausted` once every id has been handed out.
    pub fn next_id(&mut self) -> Result<u32> {
        let id = self.next.ok_or(ConversionError::ShapeIdsExhausted)?;
        self.next = id.checked_add(1);
        Ok(id)
    }
}

// --- Report ---

/// Summary of one document conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub shapes_emitted: usize,
    /// Per-element problems that were recovered from.
    pub warnings: Vec<ConversionWarning>,
}

// --- Converter ---

/// Builder for creating a `Converter`.
#[derive(Debug, Clone, Default)]
pub struct ConverterBuilder {
    width: Option<f64>,
    height: Option<f64>,
    options: ConversionOptions,
}

impl ConverterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared width of the source drawing. Takes precedence over `options.width`.
    pub fn set_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Declared height of the source drawing. Takes precedence over `options.height`.
    pub fn set_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn set_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the `Converter`.
    ///
    /// # Returns
    /// `Err(ConversionError::InvalidDimensions)` when a declared size is not positive and finite.
    pub fn build(self) -> Result<Converter> {
        let mut options = self.options;
        options.width = self.width.or(options.width);
        options.height = self.height.or(options.height);

        let mapper = CoordinateMapper::new(
            options.width,
            options.height,
            options.canvas_width,
            options.canvas_height,
        )?;
        let ids = ShapeIdCounter::new(options.first_shape_id);

        Ok(Converter {
            options,
            mapper,
            ids,
        })
    }
}

/// Converts source documents into slide shapes.
///
/// The id counter lives as long as the converter, so shapes from successive documents
/// converted by the same instance never share an id.
#[derive(Debug, Clone)]
pub struct Converter {
    options: ConversionOptions,
    mapper: CoordinateMapper,
    ids: ShapeIdCounter,
}

impl Converter {
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// The id the next emitted shape will receive, or `None` when ids are exhausted.
    pub fn next_shape_id(&self) -> Option<u32> {
        self.ids.peek()
    }

    /// Parses SVG text and converts it.
    ///
    /// # Arguments
    /// * `svg` - The SVG document as text.
    /// * `container` - Receives the emitted shapes.
    pub fn convert_str(
        &mut self,
        svg: &str,
        container: &mut impl ShapeContainer,
    ) -> Result<ConversionReport> {
        let doc = SourceDocument::parse(svg)?;
        self.convert_document(&doc, container)
    }

    /// Walks the document depth-first in document order and appends one shape per
    /// recognised element. Unrecognised elements are skipped but their children are still
    /// visited. Element-level failures are reported as warnings and do not stop the walk.
    ///
    /// # Arguments
    /// * `doc` - The source document.
    /// * `container` - Receives the emitted shapes.
    ///
    /// # Returns
    /// A `ConversionReport` with the number of shapes emitted and any warnings.
    pub fn convert_document(
        &mut self,
        doc: &SourceDocument,
        container: &mut impl ShapeContainer,
    ) -> Result<ConversionReport> {
        let ctx = EmitContext {
            doc,
            mapper: &self.mapper,
            options: &self.options,
        };
        let mut report = ConversionReport::default();

        for id in doc.descendants() {
            let element = doc.get(id);
            let Some(kind) = ElementKind::from_tag(&element.tag) else {
                debug!("Skipping unsupported element <{}>", element.tag);
                continue;
            };

            match emit_shape(kind, &ctx, id, &mut report.warnings) {
                Ok(Some(draft)) => {
                    let shape = draft.into_node(self.ids.next_id()?);
                    debug!("Emitted '{}' from <{}>", shape.name, element.tag);
                    container.append_shape(shape);
                    report.shapes_emitted += 1;
                }
                Ok(None) => {}
                Err(ConversionError::MalformedPath(reason)) => {
                    warn!("Skipping <{}> with malformed path data: {}", element.tag, reason);
                    report.warnings.push(ConversionWarning {
                        tag: element.tag.clone(),
                        kind: WarningKind::MalformedPath,
                        message: reason,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Converted document: {} shapes emitted, {} warnings",
            report.shapes_emitted,
            report.warnings.len()
        );
        Ok(report)
    }
}
