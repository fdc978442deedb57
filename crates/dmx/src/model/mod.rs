//! Data model types for DMX documents.
//!
//! - Identifiers (GUIDs in canonical byte order)
//! - The attribute type system (14 scalar kinds + 14 array kinds)
//! - Elements (named graph nodes with ordered attributes)
//! - Documents (the element arena plus format metadata)

pub mod attribute;
pub mod document;
pub mod element;
pub mod id;

pub use attribute::{
    Attribute, AttributeType, AttributeValue, Color, ScalarValue, ARRAY_KIND_OFFSET,
};
pub use document::Document;
pub use element::{Element, ElementHandle};
pub use id::{format_guid, guid_from_wire, guid_to_wire, parse_guid, random_guid, Id, NIL_ID};
