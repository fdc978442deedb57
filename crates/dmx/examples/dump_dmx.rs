//! Reads a DMX file into memory, decodes it and prints the KeyValues2 text.

use std::fs;

use dmx::{decode, encode_text_with_lines, format_guid, AttributeValue};

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "sample.pcf".to_string());

    println!("Reading: {}", path);
    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let document = match decode(&data) {
        Ok(Some(document)) => document,
        Ok(None) => {
            eprintln!("Not a DMX container");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("Decode failed: {}", err);
            std::process::exit(1);
        }
    };

    println!("\n=== Document ===");
    println!("Format: {} v{}", document.format, document.version);
    println!("Elements: {}", document.element_count());

    for (handle, element) in document.elements().take(20) {
        let arrays = element
            .attributes
            .values()
            .filter(|a| matches!(a.value, AttributeValue::Array(_)))
            .count();
        println!(
            "[{}] {} {:?} ({} attributes, {} arrays) {}",
            handle,
            element.class,
            element.name,
            element.attributes.len(),
            arrays,
            format_guid(&element.id)
        );
    }

    if let Some(encoded) = encode_text_with_lines(&document) {
        println!("\n=== KeyValues2 ({} lines) ===", encoded.text.lines().count());
        println!("{}", encoded.text);
    }
}
