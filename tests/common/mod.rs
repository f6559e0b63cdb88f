#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Minimal PNG: signature plus an IHDR chunk, enough for dimension probing.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(33);
    bytes.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);

    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.push(8); // bit depth
    bytes.push(2); // color type: RGB
    bytes.push(0); // compression
    bytes.push(0); // filter
    bytes.push(0); // interlace
    bytes.extend_from_slice(&0u32.to_be_bytes()); // CRC is not checked when probing

    bytes
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, png_bytes(width, height)).expect("write png file");
}
