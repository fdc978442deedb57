//! Wire-format constants.

/// How many leading bytes are scanned for the ASCII header.
pub const HEADER_PROBE_LEN: usize = 1000;

/// Header terminator token; the binary body starts 5 bytes past its position
/// (the token itself plus line-end padding).
pub const HEADER_TERMINATOR: &str = "-->";

/// Encoding name that selects the binary body layout.
pub const BINARY_ENCODING: &str = "binary";

/// First encoding version with 32-bit table counts and string-table-indexed
/// names. Older versions use 16-bit counts and inline NUL-terminated names.
pub const WIDE_TABLE_VERSION: u32 = 5;

/// Fixed-point tick rate of the Time attribute kind (ticks per second).
pub const TIME_TICKS_PER_SECOND: f32 = 10_000.0;

/// Encoding tag the text encoder always writes, independent of what was
/// decoded.
pub const TEXT_ENCODING_NAME: &str = "keyvalues2";
pub const TEXT_ENCODING_VERSION: u32 = 4;

/// Decimal places floats are rounded to in text output.
pub const FLOAT_TEXT_DECIMALS: i32 = 6;

/// Element display name that gets an extra line-map entry keyed by name,
/// pointing at the element's `"id"` line (a particle-tooling convenience).
pub const PARTICLE_SYSTEM_DEFINITION: &str = "DmeParticleSystemDefinition";
