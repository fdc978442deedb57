//! Elements: the named, typed nodes of the document graph.

use indexmap::IndexMap;

use crate::model::attribute::Attribute;
use crate::model::id::{random_guid, Id};

/// Arena handle addressing an element inside its [`Document`](crate::model::Document).
///
/// Elements reference each other through handles rather than owned pointers;
/// the graph may be cyclic and elements may be shared by several parents.
pub type ElementHandle = usize;

/// A named, typed node with an ordered set of attributes.
///
/// Attribute order is preserved because the text encoder emits attributes in
/// insertion order. Re-setting an existing name replaces the value in place
/// (last write wins).
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: Id,
    /// Class name, e.g. `DmElement` or `DmeParticleSystemDefinition`.
    pub class: String,
    /// Display name.
    pub name: String,
    pub attributes: IndexMap<String, Attribute>,
}

impl Element {
    /// Creates an element with a fresh random GUID.
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_id(random_guid(), class, name)
    }

    /// Creates an element with an explicit GUID (the decoder path).
    pub fn with_id(id: Id, class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            class: class.into(),
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Attaches an attribute, replacing any previous attribute of that name.
    pub fn set_attribute(&mut self, name: impl Into<String>, attribute: Attribute) {
        self.attributes.insert(name.into(), attribute);
    }

    /// Looks up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}
