//! Decoding and encoding of DMX containers.
//!
//! Binary decoding and KeyValues2 text encoding are both single synchronous
//! passes over in-memory data; see [`decode::decode`] and
//! [`encode::encode_text`].

pub mod decode;
pub mod encode;
pub mod primitives;

pub use decode::decode;
pub use encode::{encode_text, encode_text_with_lines, EncodedText};
pub use primitives::Reader;
