//! KeyValues2 text encoding of DMX documents.
//!
//! The encoder walks the element graph from the root and decides, per
//! element, whether it can be embedded at its use site or must be declared
//! as its own top-level block:
//!
//! - An element first reached as an `ElementArray` member is tentatively
//!   inlineable; any second arrival over any edge pins it as top-level.
//! - The target of a singular `Element` attribute is always top-level; a
//!   singular reference renders by id, never as embedded content.
//!
//! Output lines are collected one at a time, so the per-element line map is
//! exact by construction.

use indexmap::map::Entry;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::limits::{
    FLOAT_TEXT_DECIMALS, PARTICLE_SYSTEM_DEFINITION, TEXT_ENCODING_NAME, TEXT_ENCODING_VERSION,
};
use crate::model::{
    format_guid, Attribute, AttributeType, AttributeValue, Document, Element, ElementHandle,
    ScalarValue,
};

/// Rendered text plus the 1-based line number of every element's opening line.
///
/// The map is keyed by the element's id string; elements named
/// `DmeParticleSystemDefinition` get an extra entry keyed by that name which
/// points at their `"id"` line instead.
#[derive(Debug, Clone)]
pub struct EncodedText {
    pub text: String,
    pub element_lines: FxHashMap<String, usize>,
}

/// Renders a document as KeyValues2 text. `None` if the document has no root.
pub fn encode_text(document: &Document) -> Option<String> {
    encode_text_with_lines(document).map(|encoded| encoded.text)
}

/// Renders a document as KeyValues2 text together with the line map.
pub fn encode_text_with_lines(document: &Document) -> Option<EncodedText> {
    let root = document.root?;
    let inline = classify_inline(document, root);

    let mut writer = TextWriter::default();
    writer.push_line(format!(
        "<!-- dmx encoding {} {} format {} {} -->",
        TEXT_ENCODING_NAME, TEXT_ENCODING_VERSION, document.format, document.version
    ));

    if let Some(element) = document.element(root) {
        write_element(&mut writer, document, &inline, element, "");
    }

    for (&handle, &inlined) in &inline {
        if handle == root || inlined {
            continue;
        }
        let Some(element) = document.element(handle) else {
            continue;
        };
        write_element(&mut writer, document, &inline, element, "");
        writer.push_line("");
    }

    Some(writer.finish())
}

/// Classifies every reachable element as inlineable (`true`) or top-level
/// (`false`), in discovery order.
///
/// Iterative DFS with an explicit stack; the `done` set gates re-expansion
/// only, so cyclic and shared references terminate while every arrival still
/// counts toward the classification.
fn classify_inline(document: &Document, root: ElementHandle) -> IndexMap<ElementHandle, bool> {
    let mut state: IndexMap<ElementHandle, bool> = IndexMap::new();
    let mut done: FxHashSet<ElementHandle> = FxHashSet::default();
    let mut stack = vec![root];

    while let Some(current) = stack.pop() {
        match state.entry(current) {
            Entry::Vacant(entry) => {
                entry.insert(true);
            }
            Entry::Occupied(mut entry) => {
                entry.insert(false);
            }
        }
        if !done.insert(current) {
            continue;
        }
        let Some(element) = document.element(current) else {
            continue;
        };

        for attribute in element.attributes.values() {
            match &attribute.value {
                AttributeValue::Single(ScalarValue::Element(Some(target))) => {
                    // A singular reference always renders by id.
                    *state.entry(*target).or_insert(false) = false;
                    stack.push(*target);
                }
                AttributeValue::Array(members) if attribute.kind == AttributeType::ElementArray => {
                    for member in members {
                        if let ScalarValue::Element(Some(target)) = member {
                            stack.push(*target);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    state
}

#[derive(Debug, Default)]
struct TextWriter {
    lines: Vec<String>,
    tabs: usize,
    element_lines: FxHashMap<String, usize>,
}

impl TextWriter {
    /// 1-based number of the line the next `push_line` will produce.
    fn next_line(&self) -> usize {
        self.lines.len() + 1
    }

    fn push_line(&mut self, content: impl AsRef<str>) {
        let content = content.as_ref();
        if content.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", "\t".repeat(self.tabs), content));
        }
    }

    fn finish(self) -> EncodedText {
        EncodedText { text: self.lines.join("\n"), element_lines: self.element_lines }
    }
}

/// Renders one element block; `trailing` is appended to the closing brace
/// (the `,` after inline array members).
fn write_element(
    writer: &mut TextWriter,
    document: &Document,
    inline: &IndexMap<ElementHandle, bool>,
    element: &Element,
    trailing: &str,
) {
    writer.element_lines.insert(format_guid(&element.id), writer.next_line());
    writer.push_line(format!("\"{}\"", element.class));
    writer.push_line("{");
    writer.tabs += 1;
    if element.name == PARTICLE_SYSTEM_DEFINITION {
        writer.element_lines.insert(element.name.clone(), writer.next_line());
    }
    writer.push_line(format!("\"id\" \"elementid\" \"{}\"", format_guid(&element.id)));
    writer.push_line(format!("\"name\" \"string\" \"{}\"", element.name));

    for (name, attribute) in &element.attributes {
        write_attribute(writer, document, inline, name, attribute);
    }

    writer.tabs -= 1;
    writer.push_line(format!("}}{}", trailing));
}

fn write_attribute(
    writer: &mut TextWriter,
    document: &Document,
    inline: &IndexMap<ElementHandle, bool>,
    name: &str,
    attribute: &Attribute,
) {
    match &attribute.value {
        AttributeValue::Single(value) => write_scalar_attribute(writer, document, name, value),
        AttributeValue::Array(members) => {
            write_array_attribute(writer, document, inline, name, attribute.kind, members)
        }
    }
}

fn write_scalar_attribute(
    writer: &mut TextWriter,
    document: &Document,
    name: &str,
    value: &ScalarValue,
) {
    match value {
        ScalarValue::Element(target) => {
            writer.push_line(format!(
                "\"{}\" \"element\" \"{}\"",
                name,
                reference_id(document, *target)
            ));
        }
        ScalarValue::Integer(v) => writer.push_line(format!("\"{}\" \"int\" {}", name, v)),
        ScalarValue::Float(v) => {
            writer.push_line(format!("\"{}\" \"float\" {}", name, format_float(*v)))
        }
        ScalarValue::Boolean(v) => {
            writer.push_line(format!("\"{}\" \"bool\" {}", name, if *v { 1 } else { 0 }))
        }
        ScalarValue::String(v) => writer.push_line(format!("\"{}\" \"string\" \"{}\"", name, v)),
        ScalarValue::Color(c) => {
            // Raw channel * 255 products, no rounding or clamping.
            writer.push_line(format!(
                "\"{}\" \"color\" \"{} {} {} {}\"",
                name,
                c.red * 255.0,
                c.green * 255.0,
                c.blue * 255.0,
                c.alpha * 255.0
            ));
        }
        ScalarValue::Vec2(v) => {
            writer.push_line(format!("\"{}\" \"vector2\" \"{}\"", name, format_floats(v)))
        }
        ScalarValue::Vec3(v) => {
            writer.push_line(format!("\"{}\" \"vector3\" \"{}\"", name, format_floats(v)))
        }
        ScalarValue::Vec4(v) => {
            writer.push_line(format!("\"{}\" \"vector4\" \"{}\"", name, format_floats(v)))
        }
        ScalarValue::Quaternion(v) => {
            writer.push_line(format!("\"{}\" \"quaternion\" \"{}\"", name, format_floats(v)))
        }
        ScalarValue::Binary(_) | ScalarValue::Time(_) | ScalarValue::QAngle(_)
        | ScalarValue::Matrix(_) => {
            // Known gap: these kinds have no supported text rendering.
            log::warn!("skipping attribute {:?} of kind {:?}: no text rendering", name, value.kind());
            writer.push_line(format!("\"{}\"", name));
        }
    }
}

fn write_array_attribute(
    writer: &mut TextWriter,
    document: &Document,
    inline: &IndexMap<ElementHandle, bool>,
    name: &str,
    kind: AttributeType,
    members: &[ScalarValue],
) {
    match kind.scalar_kind() {
        AttributeType::Element => {
            write_element_array(writer, document, inline, name, members)
        }
        scalar @ (AttributeType::Integer
        | AttributeType::Float
        | AttributeType::Vec2
        | AttributeType::Vec3
        | AttributeType::Vec4
        | AttributeType::Quaternion) => {
            let token = scalar.text_name().unwrap_or("unknown");
            let items: Vec<String> = members.iter().map(quote_scalar_item).collect();
            writer.push_line(format!(
                "\"{}\" \"{}_array\" [ {} ]",
                name,
                token,
                items.join(", ")
            ));
        }
        other => {
            // Known gap: boolean/string/binary/time/color/qangle/matrix
            // arrays have no supported text rendering.
            log::warn!("skipping array attribute {:?} of kind {:?}: no text rendering", name, other);
            writer.push_line(format!("\"{}\"", name));
        }
    }
}

/// Renders one scalar array item as its quoted literal.
fn quote_scalar_item(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Integer(v) => format!("\"{}\"", v),
        ScalarValue::Float(v) => format!("\"{}\"", format_float(*v)),
        ScalarValue::Vec2(v) => format!("\"{}\"", format_floats(v)),
        ScalarValue::Vec3(v) => format!("\"{}\"", format_floats(v)),
        ScalarValue::Vec4(v) | ScalarValue::Quaternion(v) => format!("\"{}\"", format_floats(v)),
        _ => String::from("\"\""),
    }
}

fn write_element_array(
    writer: &mut TextWriter,
    document: &Document,
    inline: &IndexMap<ElementHandle, bool>,
    name: &str,
    members: &[ScalarValue],
) {
    writer.push_line(format!("\"{}\" \"element_array\"", name));
    writer.push_line("[");
    writer.tabs += 1;

    for member in members {
        let target = match member {
            ScalarValue::Element(target) => *target,
            other => {
                log::warn!("element array {:?} holds non-element member {:?}", name, other.kind());
                continue;
            }
        };
        let element = target.and_then(|handle| document.element(handle));
        let inlined =
            target.map(|handle| inline.get(&handle).copied().unwrap_or(false)).unwrap_or(false);

        match element {
            Some(element) if inlined => {
                write_element(writer, document, inline, element, ",");
            }
            Some(element) => {
                writer.push_line(format!(
                    "{} \"element\" \"{}\",",
                    element.name,
                    format_guid(&element.id)
                ));
            }
            None => {
                writer.push_line("null \"element\" \"null\",");
            }
        }
    }

    writer.tabs -= 1;
    writer.push_line("]");
}

fn reference_id(document: &Document, target: Option<ElementHandle>) -> String {
    target
        .and_then(|handle| document.element(handle))
        .map(|element| format_guid(&element.id))
        .unwrap_or_else(|| "null".to_string())
}

/// Rounds to a fixed number of decimal places in f64.
fn round_decimals(value: f64) -> f64 {
    let scale = 10f64.powi(FLOAT_TEXT_DECIMALS);
    (value * scale).round() / scale
}

/// Formats a float rounded to 6 decimal places with trailing zeros stripped
/// (re-stringified through the rounded number, so 1.0 prints as `1`).
fn format_float(value: f32) -> String {
    format!("{}", round_decimals(value as f64))
}

fn format_floats(values: &[f32]) -> String {
    values.iter().map(|&v| format_float(v)).collect::<Vec<_>>().join(" ")
}
