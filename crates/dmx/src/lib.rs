//! DMX: binary decoder and KeyValues2 text encoder for the Source element
//! container format.
//!
//! A DMX container holds a graph of typed, named elements with scalar and
//! array attributes. This crate decodes the binary encoding into an
//! in-memory [`Document`] and renders documents as KeyValues2 text,
//! including the element-inlining traversal and a per-element output
//! line-number map for external tooling.
//!
//! # Quick Start
//!
//! ```rust
//! use dmx::{decode, encode_text, Attribute, Document, Element};
//!
//! // Probe a buffer; a non-DMX buffer yields Ok(None), not an error.
//! assert_eq!(decode(b"not a dmx container").unwrap(), None);
//!
//! // Build a document programmatically and render it as text.
//! let mut document = Document::new("pcf", 3);
//! let root = document.push_element(Element::new("DmElement", "root"));
//! document.root = Some(root);
//! document
//!     .element_mut(root)
//!     .unwrap()
//!     .set_attribute("count", Attribute::integer(5));
//!
//! let text = encode_text(&document).unwrap();
//! assert!(text.starts_with("<!-- dmx encoding keyvalues2 4 format pcf 3 -->"));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Core data types (Document, Element, Attribute, GUIDs)
//! - [`codec`]: Binary decoding and KeyValues2 text encoding
//! - [`error`]: Error types
//! - [`limits`]: Wire-format constants
//!
//! # Scope
//!
//! Text *decoding* is not implemented: a header that selects a non-binary
//! encoding is a fatal [`DecodeError::TextDecodingUnsupported`]. Binary
//! attribute payloads are consumed but not retained, and a handful of
//! attribute kinds have no text rendering; both are deliberate gaps of the
//! format's reference tooling that this crate preserves.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{decode, encode_text, encode_text_with_lines, EncodedText};
pub use error::DecodeError;
pub use model::{
    format_guid, guid_from_wire, parse_guid, random_guid, Attribute, AttributeType,
    AttributeValue, Color, Document, Element, ElementHandle, Id, ScalarValue, NIL_ID,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
