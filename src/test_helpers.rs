//! Fixture builders shared by unit tests.

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

pub fn encoded(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format).unwrap();
    bytes.into_inner()
}

/// A `width`x`height` JPEG as stored on disk, carrying an EXIF orientation tag.
///
/// The APP1 segment holds a big-endian TIFF header with a single IFD entry
/// (tag 0x0112, SHORT) and is placed directly after SOI.
pub fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let jpeg = encoded(
        &DynamicImage::ImageRgb8(RgbImage::new(width, height)),
        ImageFormat::Jpeg,
    );
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2A\x00\x00\x00\x08");
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes());

    let mut app1 = b"Exif\x00\x00".to_vec();
    app1.extend_from_slice(&tiff);

    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}
