//! GUID identifiers for DMX elements.
//!
//! Every element carries a 128-bit GUID. On the wire the first three byte
//! groups are stored little-endian (the Microsoft mixed-endian layout);
//! in memory ids are always held in canonical big-endian order and rendered
//! as lowercase hyphenated `8-4-4-4-12` hex.

use uuid::Uuid;

/// A 16-byte GUID in canonical byte order.
pub type Id = [u8; 16];

/// The zero/nil GUID.
pub const NIL_ID: Id = [0u8; 16];

/// Normalizes 16 raw wire bytes into a canonical id.
///
/// The binary format stores the `8-4-4` prefix groups little-endian, so the
/// first three groups are byte-reversed; the trailing 8 bytes are kept as-is.
pub fn guid_from_wire(bytes: [u8; 16]) -> Id {
    Uuid::from_bytes_le(bytes).into_bytes()
}

/// Converts a canonical id back into its wire byte order.
pub fn guid_to_wire(id: &Id) -> [u8; 16] {
    Uuid::from_bytes(*id).to_bytes_le()
}

/// Generates a random (v4) id for programmatically built elements.
pub fn random_guid() -> Id {
    Uuid::new_v4().into_bytes()
}

/// Formats an id as lowercase hyphenated `8-4-4-4-12` hex.
pub fn format_guid(id: &Id) -> String {
    Uuid::from_bytes(*id).hyphenated().to_string()
}

/// Parses an id from hex text (with or without hyphens).
pub fn parse_guid(s: &str) -> Option<Id> {
    Uuid::try_parse(s).ok().map(Uuid::into_bytes)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_guid_from_wire_reverses_prefix_groups() {
        let wire = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
            0xEE, 0xFF,
        ];
        let id = guid_from_wire(wire);
        assert_eq!(format_guid(&id), "33221100-5544-7766-8899-aabbccddeeff");
    }

    #[test]
    fn test_guid_wire_roundtrip() {
        let wire = [7u8, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
        let id = guid_from_wire(wire);
        assert_eq!(guid_to_wire(&id), wire);
    }

    #[test]
    fn test_format_parse_roundtrip() {
        let id = random_guid();
        let formatted = format_guid(&id);
        let parsed = parse_guid(&formatted).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_without_hyphens() {
        let id1 = parse_guid("550e8400e29b41d4a716446655440000").unwrap();
        let id2 = parse_guid("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_format_is_lowercase() {
        let id = guid_from_wire([0xAB; 16]);
        let formatted = format_guid(&id);
        assert_eq!(formatted, formatted.to_lowercase());
        assert_eq!(formatted.len(), 36);
    }

    proptest! {
        #[test]
        fn prop_wire_transform_roundtrips(bytes in proptest::array::uniform16(any::<u8>())) {
            let id = guid_from_wire(bytes);
            prop_assert_eq!(guid_to_wire(&id), bytes);
            prop_assert_eq!(parse_guid(&format_guid(&id)), Some(id));
        }
    }
}
