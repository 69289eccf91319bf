//! Fixtures shared by unit tests

use image::{ImageBuffer, ImageFormat, Rgba};
use std::io::Cursor;

use crate::payload::Payload;
use crate::state::data::ContentKind;

/// An 8x4 opaque red PNG
pub fn tiny_png() -> Vec<u8> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_pixel(8, 4, Rgba([200, 30, 30, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn link_payload(url: &str) -> Payload {
    Payload {
        content: url.to_string(),
        kind: ContentKind::Link,
        name: "example.com".to_string(),
    }
}
