//! Binary decoding of DMX documents.
//!
//! The container opens with an ASCII header naming the encoding and format;
//! a binary body is a string table, an element table (two passes: shells,
//! then attributes) and per-attribute payloads. Decoding is a single
//! synchronous pass: it either produces a full document, reports the buffer
//! as not-this-format, or fails with no partial graph.

use crate::codec::primitives::Reader;
use crate::error::DecodeError;
use crate::limits::{BINARY_ENCODING, HEADER_PROBE_LEN, HEADER_TERMINATOR, WIDE_TABLE_VERSION};
use crate::model::{
    guid_from_wire, Attribute, AttributeType, Color, Document, Element, ElementHandle,
    ScalarValue, ARRAY_KIND_OFFSET,
};

/// Parsed ASCII header of a DMX container.
#[derive(Debug, Clone, PartialEq)]
struct Header {
    encoding: String,
    encoding_version: u32,
    format: String,
    version: u32,
    /// Absolute offset of the first body byte.
    body_offset: usize,
}

struct DecodeContext<'a> {
    reader: Reader<'a>,
    encoding_version: u32,
    strings: Vec<String>,
    element_count: usize,
}

/// Decodes a DMX document from a full in-memory buffer.
///
/// Returns `Ok(None)` when the buffer does not carry a recognizable DMX
/// header, so callers can chain format probes. A recognized header with a
/// non-binary encoding is fatal: text decoding is not implemented.
pub fn decode(input: &[u8]) -> Result<Option<Document>, DecodeError> {
    let Some(header) = parse_header(input) else {
        return Ok(None);
    };

    if header.encoding != BINARY_ENCODING {
        return Err(DecodeError::TextDecodingUnsupported { encoding: header.encoding });
    }

    let mut document = Document::new(header.format, header.version);
    let mut context = DecodeContext {
        reader: Reader::new(input),
        encoding_version: header.encoding_version,
        strings: Vec::new(),
        element_count: 0,
    };
    decode_body(&mut context, &mut document, header.body_offset)?;
    Ok(Some(document))
}

/// Probes the first bytes for `<!-- dmx encoding <enc> <encver> format <fmt> <ver> -->`.
///
/// Any mismatch means "not this format", never an error.
fn parse_header(input: &[u8]) -> Option<Header> {
    let probe = &input[..input.len().min(HEADER_PROBE_LEN)];
    let terminator = probe
        .windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR.as_bytes())?;
    if terminator == 0 {
        return None;
    }

    let text = std::str::from_utf8(&probe[..terminator + HEADER_TERMINATOR.len()]).ok()?;
    let mut tokens = text.split_whitespace();
    (tokens.next()? == "<!--").then_some(())?;
    (tokens.next()? == "dmx").then_some(())?;
    (tokens.next()? == "encoding").then_some(())?;
    let encoding = tokens.next()?.to_string();
    let encoding_version: u32 = tokens.next()?.parse().ok()?;
    (tokens.next()? == "format").then_some(())?;
    let format = tokens.next()?.to_string();
    let version: u32 = tokens.next()?.parse().ok()?;
    (tokens.next()? == HEADER_TERMINATOR).then_some(())?;
    tokens.next().is_none().then_some(())?;

    Some(Header {
        encoding,
        encoding_version,
        format,
        version,
        // Past the terminator plus line-end padding.
        body_offset: terminator + HEADER_TERMINATOR.len() + 2,
    })
}

fn decode_body(
    context: &mut DecodeContext<'_>,
    document: &mut Document,
    body_offset: usize,
) -> Result<(), DecodeError> {
    context.reader.seek(body_offset);

    decode_string_table(context)?;

    // Pass 1: element shells, so attribute payloads can reference any
    // element by index, including forward references.
    let element_count = context.reader.read_u32("element count")? as usize;
    for _ in 0..element_count {
        let element = decode_element_shell(context)?;
        document.push_element(element);
    }
    context.element_count = element_count;

    // Pass 2: attributes, in element table order.
    for index in 0..element_count {
        let attribute_count = context.reader.read_u32("attribute count")? as usize;
        for _ in 0..attribute_count {
            let (name, attribute) = decode_attribute(context)?;
            if let Some(element) = document.element_mut(index) {
                element.set_attribute(name, attribute);
            }
        }
    }

    document.root = if element_count > 0 { Some(0) } else { None };
    Ok(())
}

fn decode_string_table(context: &mut DecodeContext<'_>) -> Result<(), DecodeError> {
    let count = if context.encoding_version < WIDE_TABLE_VERSION {
        context.reader.read_u16("string table count")? as usize
    } else {
        context.reader.read_u32("string table count")? as usize
    };
    for _ in 0..count {
        let s = context.reader.read_cstring("string table entry")?;
        context.strings.push(s);
    }
    Ok(())
}

fn decode_element_shell(context: &mut DecodeContext<'_>) -> Result<Element, DecodeError> {
    let class_index = read_name_index(context, "element class")?;
    let class = table_string(context, class_index);

    let name = if context.encoding_version < WIDE_TABLE_VERSION {
        context.reader.read_cstring("element name")?
    } else {
        let index = context.reader.read_u32("element name")? as i64;
        table_string(context, index)
    };

    let wire_guid = context.reader.read_guid_bytes("element guid")?;
    Ok(Element::with_id(guid_from_wire(wire_guid), class, name))
}

fn decode_attribute(context: &mut DecodeContext<'_>) -> Result<(String, Attribute), DecodeError> {
    let name_index = read_name_index(context, "attribute name")?;
    let name = table_string(context, name_index);

    let raw_kind = context.reader.read_u8("attribute kind")?;
    let scalar_kind = AttributeType::from_u8(raw_kind % ARRAY_KIND_OFFSET)
        .ok_or(DecodeError::UnsupportedAttributeKind { kind: raw_kind })?;

    let attribute = if raw_kind > ARRAY_KIND_OFFSET {
        let count = context.reader.read_u32("array length")? as usize;
        let mut values = Vec::new();
        for _ in 0..count {
            values.push(decode_scalar(context, scalar_kind, raw_kind)?);
        }
        Attribute::array(scalar_kind, values)
    } else {
        Attribute::single(decode_scalar(context, scalar_kind, raw_kind)?)
    };

    Ok((name, attribute))
}

/// Decodes one scalar value of the given base kind (`wire kind mod 14`).
fn decode_scalar(
    context: &mut DecodeContext<'_>,
    kind: AttributeType,
    raw_kind: u8,
) -> Result<ScalarValue, DecodeError> {
    match kind {
        AttributeType::Element => {
            let index = context.reader.read_i32("element reference")?;
            Ok(ScalarValue::Element(resolve_element(context, index)))
        }
        AttributeType::Integer => Ok(ScalarValue::Integer(context.reader.read_i32("int value")?)),
        AttributeType::Float => Ok(ScalarValue::Float(context.reader.read_f32("float value")?)),
        AttributeType::Boolean => {
            Ok(ScalarValue::Boolean(context.reader.read_i8("bool value")? != 0))
        }
        AttributeType::String => {
            let value = if context.encoding_version < WIDE_TABLE_VERSION {
                context.reader.read_cstring("string value")?
            } else {
                let index = context.reader.read_i32("string value")? as i64;
                table_string(context, index)
            };
            Ok(ScalarValue::String(value))
        }
        AttributeType::Binary => {
            // The payload is consumed but intentionally not retained.
            let len = context.reader.read_u32("binary length")? as usize;
            context.reader.skip(len, "binary payload")?;
            Ok(ScalarValue::Binary(Vec::new()))
        }
        AttributeType::Time => {
            let ticks = context.reader.read_i32("time value")?;
            Ok(ScalarValue::Time(ticks as f32 / crate::limits::TIME_TICKS_PER_SECOND))
        }
        AttributeType::Color => {
            let bytes = context.reader.read_bytes(4, "color value")?;
            Ok(ScalarValue::Color(Color::from_bytes(bytes[0], bytes[1], bytes[2], bytes[3])))
        }
        AttributeType::Vec2 => {
            let mut v = [0f32; 2];
            for component in &mut v {
                *component = context.reader.read_f32("vector2 value")?;
            }
            Ok(ScalarValue::Vec2(v))
        }
        AttributeType::Vec3 => {
            let mut v = [0f32; 3];
            for component in &mut v {
                *component = context.reader.read_f32("vector3 value")?;
            }
            Ok(ScalarValue::Vec3(v))
        }
        AttributeType::Vec4 => {
            let mut v = [0f32; 4];
            for component in &mut v {
                *component = context.reader.read_f32("vector4 value")?;
            }
            Ok(ScalarValue::Vec4(v))
        }
        AttributeType::Quaternion => {
            let mut v = [0f32; 4];
            for component in &mut v {
                *component = context.reader.read_f32("quaternion value")?;
            }
            Ok(ScalarValue::Quaternion(v))
        }
        // Unknown, QAngle and VMatrix have no decodable scalar layout.
        _ => Err(DecodeError::UnsupportedAttributeKind { kind: raw_kind }),
    }
}

/// Reads a string-table index: 16-bit before the wide-table version, 32-bit after.
fn read_name_index(context: &mut DecodeContext<'_>, field: &'static str) -> Result<i64, DecodeError> {
    if context.encoding_version < WIDE_TABLE_VERSION {
        Ok(context.reader.read_u16(field)? as i64)
    } else {
        Ok(context.reader.read_u32(field)? as i64)
    }
}

/// Resolves a string-table index; out-of-range indices yield an empty string.
fn table_string(context: &DecodeContext<'_>, index: i64) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|i| context.strings.get(i))
        .cloned()
        .unwrap_or_default()
}

/// Resolves an element-table index; out-of-range indices yield a null reference.
fn resolve_element(context: &DecodeContext<'_>, index: i32) -> Option<ElementHandle> {
    usize::try_from(index).ok().filter(|&i| i < context.element_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{format_guid, AttributeValue};

    fn header(encoding: &str, encoding_version: u32, format: &str, version: u32) -> Vec<u8> {
        let mut buf = format!(
            "<!-- dmx encoding {} {} format {} {} -->",
            encoding, encoding_version, format, version
        )
        .into_bytes();
        // The body starts 5 bytes past the terminator position.
        buf.extend_from_slice(b"\n\0");
        buf
    }

    fn push_u16(buf: &mut Vec<u8>, v: u16) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn push_u32(buf: &mut Vec<u8>, v: u32) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn push_i32(buf: &mut Vec<u8>, v: i32) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn push_f32(buf: &mut Vec<u8>, v: f32) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn push_strings(buf: &mut Vec<u8>, strings: &[&str]) {
        for s in strings {
            buf.extend_from_slice(s.as_bytes());
            buf.push(0);
        }
    }

    fn value<'a>(element: &'a Element, name: &str) -> &'a AttributeValue {
        &element.attribute(name).unwrap().value
    }

    const WIRE_GUID: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE,
        0xFF,
    ];

    #[test]
    fn test_missing_terminator_is_not_this_format() {
        assert_eq!(decode(b"just some bytes").unwrap(), None);
        assert_eq!(decode(&[]).unwrap(), None);
    }

    #[test]
    fn test_terminator_at_start_is_not_this_format() {
        assert_eq!(decode(b"--> trailing").unwrap(), None);
    }

    #[test]
    fn test_malformed_header_is_not_this_format() {
        assert_eq!(decode(b"<!-- dmx encoding binary five format pcf 3 -->\n\0").unwrap(), None);
        assert_eq!(decode(b"<!-- pcf encoding binary 5 format pcf 3 -->\n\0").unwrap(), None);
        assert_eq!(decode(b"<!-- dmx format pcf 3 -->\n\0").unwrap(), None);
    }

    #[test]
    fn test_text_encoding_is_fatal() {
        let buf = header("keyvalues2", 4, "pcf", 3);
        let result = decode(&buf);
        assert!(matches!(
            result,
            Err(DecodeError::TextDecodingUnsupported { encoding }) if encoding == "keyvalues2"
        ));
    }

    #[test]
    fn test_empty_document_has_no_root() {
        let mut buf = header("binary", 5, "pcf", 3);
        push_u32(&mut buf, 0); // string table
        push_u32(&mut buf, 0); // element table
        let doc = decode(&buf).unwrap().unwrap();
        assert_eq!(doc.format, "pcf");
        assert_eq!(doc.version, 3);
        assert!(doc.root.is_none());
        assert_eq!(doc.element_count(), 0);
    }

    #[test]
    fn test_decode_v5_document() {
        let mut buf = header("binary", 5, "pcf", 3);
        // Strings: 0 class, 1 root name, 2 child name, 3..7 attribute names, 8 value
        push_u32(&mut buf, 9);
        push_strings(
            &mut buf,
            &["DmElement", "root", "child", "count", "title", "next", "scale", "tint", "hello"],
        );

        push_u32(&mut buf, 2); // element count
        // Element 0
        push_u32(&mut buf, 0); // class
        push_u32(&mut buf, 1); // name
        buf.extend_from_slice(&WIRE_GUID);
        // Element 1
        push_u32(&mut buf, 0);
        push_u32(&mut buf, 2);
        buf.extend_from_slice(&[1u8; 16]);

        // Element 0 attributes
        push_u32(&mut buf, 5);
        push_u32(&mut buf, 3); // "count"
        buf.push(2); // Integer
        push_i32(&mut buf, -7);
        push_u32(&mut buf, 4); // "title"
        buf.push(5); // String
        push_i32(&mut buf, 8); // -> "hello"
        push_u32(&mut buf, 5); // "next"
        buf.push(1); // Element
        push_i32(&mut buf, 1);
        push_u32(&mut buf, 6); // "scale"
        buf.push(3); // Float
        push_f32(&mut buf, 1.5);
        push_u32(&mut buf, 7); // "tint"
        buf.push(8); // Color
        buf.extend_from_slice(&[255, 0, 51, 255]);
        // Element 1 attributes
        push_u32(&mut buf, 0);

        let doc = decode(&buf).unwrap().unwrap();
        assert_eq!(doc.element_count(), 2);
        assert_eq!(doc.root, Some(0));

        let root = doc.element(0).unwrap();
        assert_eq!(root.class, "DmElement");
        assert_eq!(root.name, "root");
        assert_eq!(format_guid(&root.id), "33221100-5544-7766-8899-aabbccddeeff");
        assert_eq!(root.attributes.len(), 5);

        assert_eq!(value(root, "count"), &AttributeValue::Single(ScalarValue::Integer(-7)));
        assert_eq!(
            value(root, "title"),
            &AttributeValue::Single(ScalarValue::String("hello".to_string()))
        );
        assert_eq!(value(root, "next"), &AttributeValue::Single(ScalarValue::Element(Some(1))));
        assert_eq!(value(root, "scale"), &AttributeValue::Single(ScalarValue::Float(1.5)));
        let AttributeValue::Single(ScalarValue::Color(tint)) = value(root, "tint") else {
            panic!("expected color");
        };
        assert_eq!(tint.red, 1.0);
        assert_eq!(tint.green, 0.0);
        assert_eq!(tint.alpha, 1.0);

        let child = doc.element(1).unwrap();
        assert_eq!(child.name, "child");
        assert!(child.attributes.is_empty());
    }

    #[test]
    fn test_decode_v2_uses_narrow_tables_and_inline_strings() {
        let mut buf = header("binary", 2, "mdl", 1);
        push_u16(&mut buf, 2); // string table count is 16-bit
        push_strings(&mut buf, &["DmElement", "title"]);

        push_u32(&mut buf, 1);
        push_u16(&mut buf, 0); // class index is 16-bit
        push_strings(&mut buf, &["root"]); // name is inline
        buf.extend_from_slice(&WIRE_GUID);

        push_u32(&mut buf, 1);
        push_u16(&mut buf, 1); // "title"
        buf.push(5); // String: inline before v5
        push_strings(&mut buf, &["inline value"]);

        let doc = decode(&buf).unwrap().unwrap();
        let root = doc.element(0).unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(
            value(root, "title"),
            &AttributeValue::Single(ScalarValue::String("inline value".to_string()))
        );
    }

    #[test]
    fn test_array_attribute_decode() {
        let mut buf = header("binary", 5, "pcf", 3);
        push_u32(&mut buf, 3);
        push_strings(&mut buf, &["DmElement", "root", "weights"]);

        push_u32(&mut buf, 1);
        push_u32(&mut buf, 0);
        push_u32(&mut buf, 1);
        buf.extend_from_slice(&WIRE_GUID);

        push_u32(&mut buf, 1);
        push_u32(&mut buf, 2);
        buf.push(17); // FloatArray = Float + 14
        push_u32(&mut buf, 3);
        push_f32(&mut buf, 0.25);
        push_f32(&mut buf, -1.0);
        push_f32(&mut buf, 3.75);

        let doc = decode(&buf).unwrap().unwrap();
        let attr = doc.element(0).unwrap().attribute("weights").unwrap();
        assert_eq!(attr.kind, AttributeType::FloatArray);
        assert_eq!(
            &attr.value,
            &AttributeValue::Array(vec![
                ScalarValue::Float(0.25),
                ScalarValue::Float(-1.0),
                ScalarValue::Float(3.75),
            ])
        );
    }

    #[test]
    fn test_binary_payload_is_skipped_not_retained() {
        let mut buf = header("binary", 5, "pcf", 3);
        push_u32(&mut buf, 4);
        push_strings(&mut buf, &["DmElement", "root", "blob", "after"]);

        push_u32(&mut buf, 1);
        push_u32(&mut buf, 0);
        push_u32(&mut buf, 1);
        buf.extend_from_slice(&WIRE_GUID);

        push_u32(&mut buf, 2);
        push_u32(&mut buf, 2); // "blob"
        buf.push(6); // Binary
        push_u32(&mut buf, 4);
        buf.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        push_u32(&mut buf, 3); // "after"
        buf.push(2); // Integer
        push_i32(&mut buf, 42);

        let doc = decode(&buf).unwrap().unwrap();
        let root = doc.element(0).unwrap();
        assert_eq!(value(root, "blob"), &AttributeValue::Single(ScalarValue::Binary(Vec::new())));
        // The cursor must land exactly past the payload.
        assert_eq!(value(root, "after"), &AttributeValue::Single(ScalarValue::Integer(42)));
    }

    #[test]
    fn test_out_of_range_lookups_are_lenient() {
        let mut buf = header("binary", 5, "pcf", 3);
        push_u32(&mut buf, 2);
        push_strings(&mut buf, &["DmElement", "dangling"]);

        push_u32(&mut buf, 1);
        push_u32(&mut buf, 0);
        push_u32(&mut buf, 99); // name index out of range -> ""
        buf.extend_from_slice(&WIRE_GUID);

        push_u32(&mut buf, 1);
        push_u32(&mut buf, 1); // "dangling"
        buf.push(1); // Element
        push_i32(&mut buf, 7); // element index out of range -> null

        let doc = decode(&buf).unwrap().unwrap();
        let root = doc.element(0).unwrap();
        assert_eq!(root.name, "");
        assert_eq!(value(root, "dangling"), &AttributeValue::Single(ScalarValue::Element(None)));
    }

    #[test]
    fn test_unsupported_scalar_kind_is_fatal() {
        let mut buf = header("binary", 5, "pcf", 3);
        push_u32(&mut buf, 2);
        push_strings(&mut buf, &["DmElement", "angles"]);

        push_u32(&mut buf, 1);
        push_u32(&mut buf, 0);
        push_u32(&mut buf, 0);
        buf.extend_from_slice(&WIRE_GUID);

        push_u32(&mut buf, 1);
        push_u32(&mut buf, 1);
        buf.push(12); // QAngle: no decodable layout
        push_f32(&mut buf, 0.0);

        let result = decode(&buf);
        assert!(matches!(result, Err(DecodeError::UnsupportedAttributeKind { kind: 12 })));
    }

    #[test]
    fn test_truncated_body_is_fatal() {
        let mut buf = header("binary", 5, "pcf", 3);
        push_u32(&mut buf, 1);
        push_strings(&mut buf, &["DmElement"]);
        push_u32(&mut buf, 3); // claims 3 elements, provides none
        let result = decode(&buf);
        assert!(matches!(result, Err(DecodeError::UnexpectedEof { .. })));
    }
}
