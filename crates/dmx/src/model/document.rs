//! The document: an arena of elements plus format metadata.

use crate::model::element::{Element, ElementHandle};

/// One decoded (or programmatically built) DMX document.
///
/// The element arena keeps every node alive for the life of the document, so
/// shared and cyclic references are plain handles with no ownership cycles.
/// A fresh document is created per decode; nothing is shared across calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Free-form format identifier from the header, e.g. `pcf` or `model`.
    pub format: String,
    /// Format version from the header.
    pub version: u32,
    /// The root element, if the document has any elements at all.
    pub root: Option<ElementHandle>,
    elements: Vec<Element>,
}

impl Document {
    pub fn new(format: impl Into<String>, version: u32) -> Self {
        Self {
            format: format.into(),
            version,
            root: None,
            elements: Vec::new(),
        }
    }

    /// Adds an element to the arena and returns its handle.
    pub fn push_element(&mut self, element: Element) -> ElementHandle {
        self.elements.push(element);
        self.elements.len() - 1
    }

    /// Resolves a handle; out-of-range handles yield `None` rather than
    /// failing, matching the wire format's tolerance for dangling indices.
    pub fn element(&self, handle: ElementHandle) -> Option<&Element> {
        self.elements.get(handle)
    }

    pub fn element_mut(&mut self, handle: ElementHandle) -> Option<&mut Element> {
        self.elements.get_mut(handle)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> impl Iterator<Item = (ElementHandle, &Element)> {
        self.elements.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_resolve() {
        let mut doc = Document::new("pcf", 3);
        let h = doc.push_element(Element::new("DmElement", "root"));
        assert_eq!(h, 0);
        assert_eq!(doc.element(h).unwrap().name, "root");
        assert!(doc.element(99).is_none());
    }

    #[test]
    fn test_new_document_has_no_root() {
        let doc = Document::new("pcf", 3);
        assert!(doc.root.is_none());
        assert_eq!(doc.element_count(), 0);
    }
}
