//! An owned, read-only view of a parsed SVG document.
//!
//! The converter only needs tag names, attributes, the inline `style` string, direct text
//! content and parent/child navigation, so the document is flattened into an arena of
//! `SourceElement`s addressed by `ElementId`. Parents are stored as ids, never as owning links.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered attribute mapping (name → raw value), in document order.
pub type AttributeMap = IndexMap<String, String>;

/// Index of an element inside its `SourceDocument`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(usize);

/// A single element of the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceElement {
    /// Local tag name, namespace prefix stripped (`rect`, `g`, `path`, ...).
    pub tag: String,
    /// Plain attributes. The `style` attribute is kept separately in `style`.
    pub attributes: AttributeMap,
    /// Inline declaration list from the `style` attribute, if any.
    pub style: Option<String>,
    /// Direct text content (text before the first child element).
    pub text: Option<String>,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
}

impl SourceElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: AttributeMap::new(),
            style: None,
            text: None,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Adds an attribute. A `style` attribute is routed to the inline style slot.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if name == "style" {
            self.style = Some(value.into());
        } else {
            self.attributes.insert(name, value.into());
        }
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Returns the raw value of a plain attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// Arena holding every element of one source document. Element 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    elements: Vec<SourceElement>,
}

impl SourceDocument {
    /// Creates a document containing only a root element with the given tag.
    pub fn new(root_tag: &str) -> Self {
        Self {
            elements: vec![SourceElement::new(root_tag)],
        }
    }

    /// Parses SVG markup into a `SourceDocument`. A `<!DOCTYPE svg ...>` declaration is accepted.
    pub fn parse(text: &str) -> Result<Self, roxmltree::Error> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)?;
        Ok(Self::from_roxmltree(&doc))
    }

    /// Flattens an already parsed `roxmltree` document. Only element nodes are kept.
    pub fn from_roxmltree(doc: &roxmltree::Document<'_>) -> Self {
        let root = doc.root_element();
        let mut document = Self {
            elements: vec![element_from_node(root)],
        };
        let root_id = document.root();

        // (xml node, arena id of its parent), processed depth-first in document order.
        let mut pending: Vec<(roxmltree::Node<'_, '_>, ElementId)> = root
            .children()
            .filter(|n| n.is_element())
            .map(|n| (n, root_id))
            .collect();
        pending.reverse();

        while let Some((node, parent)) = pending.pop() {
            let id = document.append_element(parent, element_from_node(node));
            let children: Vec<_> = node.children().filter(|n| n.is_element()).collect();
            for child in children.into_iter().rev() {
                pending.push((child, id));
            }
        }
        document
    }

    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the element behind `id`.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this document.
    pub fn get(&self, id: ElementId) -> &SourceElement {
        &self.elements[id.0]
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).parent
    }

    /// The parent element itself, if any.
    pub fn parent_element(&self, id: ElementId) -> Option<&SourceElement> {
        self.parent(id).map(|p| self.get(p))
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.get(id).children
    }

    /// Appends `element` as the last child of `parent` and returns its id.
    pub fn append_element(&mut self, parent: ElementId, mut element: SourceElement) -> ElementId {
        let id = ElementId(self.elements.len());
        element.parent = Some(parent);
        element.children.clear();
        self.elements.push(element);
        self.elements[parent.0].children.push(id);
        id
    }

    /// Iterates the ancestors of `id`, nearest first. The element itself is not included.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: self.parent(id),
        }
    }

    /// Depth-first, pre-order walk over the whole document, starting at the root.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            document: self,
            stack: vec![self.root()],
        }
    }
}

/// Iterator returned by [`SourceDocument::ancestors`].
pub struct Ancestors<'a> {
    document: &'a SourceDocument,
    next: Option<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.next?;
        self.next = self.document.parent(current);
        Some(current)
    }
}

/// Iterator returned by [`SourceDocument::descendants`].
pub struct Descendants<'a> {
    document: &'a SourceDocument,
    stack: Vec<ElementId>,
}

impl Iterator for Descendants<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.document.children(current).iter().rev().copied());
        Some(current)
    }
}

fn element_from_node(node: roxmltree::Node<'_, '_>) -> SourceElement {
    let mut element = SourceElement::new(node.tag_name().name());
    for attr in node.attributes() {
        element = element.with_attribute(attr.name(), attr.value());
    }
    element.text = node.text().map(str::to_string);
    element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_namespaces_and_splits_style() {
        let doc = SourceDocument::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="200">
                 <g fill="red"><rect x="1" style="stroke: blue"/></g>
                 <text x="5">Hello</text>
               </svg>"#,
        )
        .expect("valid svg");

        let tags: Vec<&str> = doc
            .descendants()
            .map(|id| doc.get(id).tag.as_str())
            .collect();
        assert_eq!(tags, vec!["svg", "g", "rect", "text"]);

        let rect_id = doc.descendants().nth(2).unwrap();
        let rect = doc.get(rect_id);
        assert_eq!(rect.attribute("x"), Some("1"));
        assert!(!rect.has_attribute("style"));
        assert_eq!(rect.style.as_deref(), Some("stroke: blue"));
        assert_eq!(doc.parent_element(rect_id).unwrap().tag, "g");

        let text_id = doc.descendants().nth(3).unwrap();
        assert_eq!(doc.get(text_id).text.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_parse_accepts_doctype() {
        let doc = SourceDocument::parse(
            r#"<?xml version="1.0"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg"><circle r="1"/></svg>"#,
        )
        .expect("doctype is accepted");
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_ancestors_are_nearest_first() {
        let mut doc = SourceDocument::new("svg");
        let outer = doc.append_element(doc.root(), SourceElement::new("g"));
        let inner = doc.append_element(outer, SourceElement::new("g"));
        let leaf = doc.append_element(inner, SourceElement::new("circle"));

        let chain: Vec<ElementId> = doc.ancestors(leaf).collect();
        assert_eq!(chain, vec![inner, outer, doc.root()]);
    }
}
