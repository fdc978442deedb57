//! Error types for DMX decoding.
//!
//! A buffer that simply is not a DMX container is *not* an error: the decoder
//! returns `Ok(None)` so callers can chain format probes. `DecodeError` is
//! reserved for fatal conditions inside a recognized container; no partial
//! graph is ever returned.

use thiserror::Error;

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    /// The header selected a text encoding. Reading the text form back is
    /// not implemented anywhere; its grammar is a write-only surface here.
    #[error("text decoding is not implemented (header encoding {encoding:?})")]
    TextDecodingUnsupported { encoding: String },

    /// A scalar kind with no decodable representation (Unknown, QAngle or
    /// VMatrix residue under `kind mod 14`).
    #[error("unsupported attribute kind {kind} in binary body")]
    UnsupportedAttributeKind { kind: u8 },
}
