//! Read XMP metadata from a file
//!
//! Reads a file containing (or consisting of) an XMP packet, for
//! example a sidecar `.xmp` file or a raw segment dumped from an image,
//! and prints the tag dictionary with descriptions.

use std::env;
use std::fs;

use xmpread::{read_xmp, TagValue};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments. There should be only one
    // argument: a path to a file to be read.
    let args: Vec<String> = env::args().collect();

    let path = match args.len() {
        // args[0] = path to executable
        2 => Ok(&args[1]),
        n => Err(format!(
            "expected 1 argument (file name), got {} arguments",
            n - 1
        )),
    }?;

    let bytes = fs::read(path)?;
    let xml = String::from_utf8_lossy(&bytes);

    let meta = read_xmp(&xml);
    if meta.is_empty() {
        println!("no XMP tags found in {}", path);
        return Ok(());
    }

    for (name, tag) in meta.iter() {
        match &tag.value {
            TagValue::Text(_) => println!("{} = {}", name, tag.description),
            TagValue::Struct(_) => println!("{} = {{ {} }}", name, tag.description),
            TagValue::Array(items) => {
                println!("{} = [{}] ({} items)", name, tag.description, items.len())
            }
        }
        for (qualifier, value) in &tag.attributes {
            println!("    {} = {}", qualifier, value);
        }
    }

    Ok(())
}
