//! Byte-cursor primitives for the binary body.
//!
//! All multi-byte integers and floats in a DMX binary body are little-endian.

use crate::error::DecodeError;

/// Reader for decoding binary data.
///
/// Wraps a byte slice and provides positional, bounds-checked reads of the
/// fixed-width primitives the format uses, plus NUL-terminated strings.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor to an absolute position. Seeking past the end is
    /// allowed; the next read reports EOF.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Returns the total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if self.pos + n > self.data.len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Advances the cursor past n bytes without retaining them.
    pub fn skip(&mut self, n: usize, context: &'static str) -> Result<(), DecodeError> {
        self.read_bytes(n, context).map(|_| ())
    }

    #[inline]
    pub fn read_u8(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        let bytes = self.read_bytes(1, context)?;
        Ok(bytes[0])
    }

    #[inline]
    pub fn read_i8(&mut self, context: &'static str) -> Result<i8, DecodeError> {
        Ok(self.read_u8(context)? as i8)
    }

    #[inline]
    pub fn read_u16(&mut self, context: &'static str) -> Result<u16, DecodeError> {
        let bytes = self.read_bytes(2, context)?;
        // SAFETY of unwrap: read_bytes guarantees exactly 2 bytes
        Ok(u16::from_le_bytes(bytes.try_into().unwrap()))
    }

    #[inline]
    pub fn read_u32(&mut self, context: &'static str) -> Result<u32, DecodeError> {
        let bytes = self.read_bytes(4, context)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    #[inline]
    pub fn read_i32(&mut self, context: &'static str) -> Result<i32, DecodeError> {
        let bytes = self.read_bytes(4, context)?;
        Ok(i32::from_le_bytes(bytes.try_into().unwrap()))
    }

    #[inline]
    pub fn read_f32(&mut self, context: &'static str) -> Result<f32, DecodeError> {
        let bytes = self.read_bytes(4, context)?;
        Ok(f32::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a 16-byte GUID as raw wire bytes.
    #[inline]
    pub fn read_guid_bytes(&mut self, context: &'static str) -> Result<[u8; 16], DecodeError> {
        let bytes = self.read_bytes(16, context)?;
        Ok(bytes.try_into().unwrap())
    }

    /// Reads a NUL-terminated UTF-8 string, consuming the terminator.
    pub fn read_cstring(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let rest = &self.data[self.pos.min(self.data.len())..];
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::UnexpectedEof { context: field })?;
        let bytes = &rest[..nul];
        self.pos += nul + 1;
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }
}
