// Shared fixtures for place document integration tests
#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use place_thumb::thumbnail::MARKER;
use std::io::Cursor;

pub fn encode_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8])
    });

    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut cursor, format)
        .expect("failed to encode test image");
    cursor.into_inner()
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_image(width, height, ImageFormat::Jpeg)
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_image(width, height, ImageFormat::Png)
}

pub fn place_document_with_prefix(prefix: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut doc = prefix.to_vec();
    doc.extend_from_slice(MARKER);
    doc.push(0);
    doc.extend_from_slice(payload);
    doc
}

pub fn place_document(payload: &[u8]) -> Vec<u8> {
    place_document_with_prefix(
        b"<roblox xmlns:xmime=\"http://www.w3.org/2005/05/xmlmime\" version=\"4\">\
          <Item class=\"Workspace\" referent=\"RBX0\"><Properties/></Item>",
        payload,
    )
}

pub fn contains_marker(bytes: &[u8]) -> bool {
    bytes.windows(MARKER.len()).any(|w| w == MARKER)
}

/// Offset of the first entropy-coded byte after the SOS header.
pub fn scan_data_start(jpeg: &[u8]) -> usize {
    let sos = jpeg
        .windows(2)
        .position(|w| w == [0xFF, 0xDA])
        .expect("jpeg should contain a scan");
    let len = u16::from_be_bytes([jpeg[sos + 2], jpeg[sos + 3]]) as usize;
    sos + 2 + len
}
