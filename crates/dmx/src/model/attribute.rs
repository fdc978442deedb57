//! Attribute types and values for DMX elements.
//!
//! Attributes are typed attribute instances on elements. The wire format has
//! 14 scalar kinds and 14 matching array kinds at a fixed offset of 14, so a
//! single `kind mod 14` dispatch covers scalar and array behavior for both
//! decoding and encoding.

use crate::model::element::ElementHandle;

/// Kind offset between a scalar attribute and its array counterpart.
pub const ARRAY_KIND_OFFSET: u8 = 14;

/// Attribute kinds as encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AttributeType {
    Unknown = 0,
    Element = 1,
    Integer = 2,
    Float = 3,
    Boolean = 4,
    String = 5,
    Binary = 6,
    Time = 7,
    Color = 8,
    Vec2 = 9,
    Vec3 = 10,
    Vec4 = 11,
    QAngle = 12,
    Quaternion = 13,
    VMatrix = 14,
    ElementArray = 15,
    IntegerArray = 16,
    FloatArray = 17,
    BooleanArray = 18,
    StringArray = 19,
    BinaryArray = 20,
    TimeArray = 21,
    ColorArray = 22,
    Vec2Array = 23,
    Vec3Array = 24,
    Vec4Array = 25,
    QAngleArray = 26,
    QuaternionArray = 27,
    VMatrixArray = 28,
}

impl AttributeType {
    /// Creates an AttributeType from its wire representation.
    pub fn from_u8(v: u8) -> Option<AttributeType> {
        match v {
            0 => Some(AttributeType::Unknown),
            1 => Some(AttributeType::Element),
            2 => Some(AttributeType::Integer),
            3 => Some(AttributeType::Float),
            4 => Some(AttributeType::Boolean),
            5 => Some(AttributeType::String),
            6 => Some(AttributeType::Binary),
            7 => Some(AttributeType::Time),
            8 => Some(AttributeType::Color),
            9 => Some(AttributeType::Vec2),
            10 => Some(AttributeType::Vec3),
            11 => Some(AttributeType::Vec4),
            12 => Some(AttributeType::QAngle),
            13 => Some(AttributeType::Quaternion),
            14 => Some(AttributeType::VMatrix),
            15 => Some(AttributeType::ElementArray),
            16 => Some(AttributeType::IntegerArray),
            17 => Some(AttributeType::FloatArray),
            18 => Some(AttributeType::BooleanArray),
            19 => Some(AttributeType::StringArray),
            20 => Some(AttributeType::BinaryArray),
            21 => Some(AttributeType::TimeArray),
            22 => Some(AttributeType::ColorArray),
            23 => Some(AttributeType::Vec2Array),
            24 => Some(AttributeType::Vec3Array),
            25 => Some(AttributeType::Vec4Array),
            26 => Some(AttributeType::QAngleArray),
            27 => Some(AttributeType::QuaternionArray),
            28 => Some(AttributeType::VMatrixArray),
            _ => None,
        }
    }

    /// Returns true for the array kinds (wire values above 14).
    pub fn is_array(self) -> bool {
        self as u8 > ARRAY_KIND_OFFSET
    }

    /// Reduces any kind to its scalar base kind (`kind mod 14`).
    ///
    /// Note that `VMatrix` reduces to `Unknown`; the wire format never carries
    /// a decodable scalar matrix and the decoder rejects it.
    pub fn scalar_kind(self) -> AttributeType {
        // Always in range: x % 14 < 14.
        AttributeType::from_u8(self as u8 % ARRAY_KIND_OFFSET).unwrap()
    }

    /// Returns the array counterpart of a scalar kind (`kind + 14`).
    pub fn array_kind(self) -> Option<AttributeType> {
        if self.is_array() {
            return Some(self);
        }
        AttributeType::from_u8(self as u8 + ARRAY_KIND_OFFSET)
    }

    /// Fixed wire width in bytes of one value of this kind.
    ///
    /// Variable-width kinds (Unknown, String, Binary) report 0. Array kinds
    /// report the width of a single array member. The table is authoritative
    /// for the binary layout and would let a decoder skip fixed-width
    /// payloads without decoding them structurally.
    pub fn data_size(self) -> usize {
        match self.scalar_kind() {
            AttributeType::Unknown => {
                // VMatrix folds onto Unknown under mod 14 but has a real width.
                if self as u8 % ARRAY_KIND_OFFSET == 0 && self as u8 != 0 {
                    64
                } else {
                    0
                }
            }
            AttributeType::Element => 4,
            AttributeType::Integer => 4,
            AttributeType::Float => 4,
            AttributeType::Boolean => 1,
            AttributeType::String => 0,
            AttributeType::Binary => 0,
            AttributeType::Time => 4,
            AttributeType::Color => 4,
            AttributeType::Vec2 => 8,
            AttributeType::Vec3 => 12,
            AttributeType::Vec4 => 16,
            AttributeType::QAngle => 12,
            AttributeType::Quaternion => 16,
            _ => 0,
        }
    }

    /// KeyValues2 type token for this kind, if the text form names it.
    pub fn text_name(self) -> Option<&'static str> {
        match self {
            AttributeType::Element => Some("element"),
            AttributeType::Integer => Some("int"),
            AttributeType::Float => Some("float"),
            AttributeType::Boolean => Some("bool"),
            AttributeType::String => Some("string"),
            AttributeType::Binary => Some("binary"),
            AttributeType::Time => Some("time"),
            AttributeType::Color => Some("color"),
            AttributeType::Vec2 => Some("vector2"),
            AttributeType::Vec3 => Some("vector3"),
            AttributeType::Vec4 => Some("vector4"),
            AttributeType::QAngle => Some("qangle"),
            AttributeType::Quaternion => Some("quaternion"),
            AttributeType::VMatrix => Some("matrix"),
            _ => None,
        }
    }
}

/// An RGBA color with normalized (0.0 to 1.0) channels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self { red, green, blue, alpha }
    }

    /// Builds a color from 8-bit channels as stored on the wire.
    pub fn from_bytes(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: alpha as f32 / 255.0,
        }
    }
}

/// One scalar attribute value.
///
/// Element references are nullable arena handles into the owning
/// [`Document`](crate::model::Document); the graph may be cyclic, so values
/// never own the elements they point at.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// Reference to another element, or null.
    Element(Option<ElementHandle>),
    Integer(i32),
    Float(f32),
    Boolean(bool),
    String(String),
    /// Opaque blob. The binary decoder skips the payload and attaches an
    /// empty blob; only programmatic construction produces real bytes.
    Binary(Vec<u8>),
    /// Seconds, stored on the wire as fixed-point 1/10000s ticks.
    Time(f32),
    Color(Color),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    QAngle([f32; 3]),
    Quaternion([f32; 4]),
    Matrix([f32; 16]),
}

impl ScalarValue {
    /// Returns the scalar kind this value inhabits.
    pub fn kind(&self) -> AttributeType {
        match self {
            ScalarValue::Element(_) => AttributeType::Element,
            ScalarValue::Integer(_) => AttributeType::Integer,
            ScalarValue::Float(_) => AttributeType::Float,
            ScalarValue::Boolean(_) => AttributeType::Boolean,
            ScalarValue::String(_) => AttributeType::String,
            ScalarValue::Binary(_) => AttributeType::Binary,
            ScalarValue::Time(_) => AttributeType::Time,
            ScalarValue::Color(_) => AttributeType::Color,
            ScalarValue::Vec2(_) => AttributeType::Vec2,
            ScalarValue::Vec3(_) => AttributeType::Vec3,
            ScalarValue::Vec4(_) => AttributeType::Vec4,
            ScalarValue::QAngle(_) => AttributeType::QAngle,
            ScalarValue::Quaternion(_) => AttributeType::Quaternion,
            ScalarValue::Matrix(_) => AttributeType::VMatrix,
        }
    }
}

/// The payload of an attribute: one scalar, or an ordered run of scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Single(ScalarValue),
    Array(Vec<ScalarValue>),
}

/// A typed, named value attached to an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub kind: AttributeType,
    pub value: AttributeValue,
}

impl Attribute {
    /// Wraps a scalar value, deriving the kind from the value itself.
    pub fn single(value: ScalarValue) -> Self {
        Self { kind: value.kind(), value: AttributeValue::Single(value) }
    }

    /// Wraps a homogeneous run of scalars as an array attribute of the given
    /// scalar base kind. The kind is taken explicitly so empty arrays stay
    /// typed.
    pub fn array(scalar_kind: AttributeType, values: Vec<ScalarValue>) -> Self {
        let kind = scalar_kind.array_kind().unwrap_or(AttributeType::Unknown);
        Self { kind, value: AttributeValue::Array(values) }
    }

    pub fn element(target: Option<ElementHandle>) -> Self {
        Self::single(ScalarValue::Element(target))
    }

    pub fn integer(value: i32) -> Self {
        Self::single(ScalarValue::Integer(value))
    }

    pub fn float(value: f32) -> Self {
        Self::single(ScalarValue::Float(value))
    }

    pub fn boolean(value: bool) -> Self {
        Self::single(ScalarValue::Boolean(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::single(ScalarValue::String(value.into()))
    }

    pub fn binary(value: Vec<u8>) -> Self {
        Self::single(ScalarValue::Binary(value))
    }

    pub fn time(seconds: f32) -> Self {
        Self::single(ScalarValue::Time(seconds))
    }

    pub fn color(value: Color) -> Self {
        Self::single(ScalarValue::Color(value))
    }

    pub fn vec2(value: [f32; 2]) -> Self {
        Self::single(ScalarValue::Vec2(value))
    }

    pub fn vec3(value: [f32; 3]) -> Self {
        Self::single(ScalarValue::Vec3(value))
    }

    pub fn vec4(value: [f32; 4]) -> Self {
        Self::single(ScalarValue::Vec4(value))
    }

    pub fn qangle(value: [f32; 3]) -> Self {
        Self::single(ScalarValue::QAngle(value))
    }

    pub fn quaternion(value: [f32; 4]) -> Self {
        Self::single(ScalarValue::Quaternion(value))
    }

    pub fn matrix(value: [f32; 16]) -> Self {
        Self::single(ScalarValue::Matrix(value))
    }

    pub fn element_array(targets: Vec<Option<ElementHandle>>) -> Self {
        Self::array(
            AttributeType::Element,
            targets.into_iter().map(ScalarValue::Element).collect(),
        )
    }

    pub fn integer_array(values: Vec<i32>) -> Self {
        Self::array(
            AttributeType::Integer,
            values.into_iter().map(ScalarValue::Integer).collect(),
        )
    }

    pub fn float_array(values: Vec<f32>) -> Self {
        Self::array(
            AttributeType::Float,
            values.into_iter().map(ScalarValue::Float).collect(),
        )
    }

    pub fn vec2_array(values: Vec<[f32; 2]>) -> Self {
        Self::array(AttributeType::Vec2, values.into_iter().map(ScalarValue::Vec2).collect())
    }

    pub fn vec3_array(values: Vec<[f32; 3]>) -> Self {
        Self::array(AttributeType::Vec3, values.into_iter().map(ScalarValue::Vec3).collect())
    }

    pub fn vec4_array(values: Vec<[f32; 4]>) -> Self {
        Self::array(AttributeType::Vec4, values.into_iter().map(ScalarValue::Vec4).collect())
    }

    pub fn quaternion_array(values: Vec<[f32; 4]>) -> Self {
        Self::array(
            AttributeType::Quaternion,
            values.into_iter().map(ScalarValue::Quaternion).collect(),
        )
    }
}
