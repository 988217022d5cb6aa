use std::io::Cursor;

use super::*;

#[test]
fn decode_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let bitmap = Bitmap::decode(&buf).unwrap();
    assert_eq!(bitmap.width(), 1);
    assert_eq!(bitmap.height(), 1);
    assert_eq!(
        bitmap.data(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_rejects_garbage() {
    assert!(Bitmap::decode(b"definitely not an image").is_err());
}

#[test]
fn byte_length_must_match_dimensions() {
    assert!(Bitmap::from_rgba8_premul(2, 2, vec![0; 15]).is_err());
    assert!(Bitmap::from_rgba8_premul(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn solid_fills_every_pixel() {
    let b = Bitmap::solid(3, 2, [255, 0, 0, 255]).unwrap();
    assert!(!b.is_empty());
    assert!(b.data().chunks_exact(4).all(|px| px == [255, 0, 0, 255]));
}

#[test]
fn empty_bitmap_reports_empty() {
    let b = Bitmap::from_rgba8_premul(0, 4, Vec::new()).unwrap();
    assert!(b.is_empty());
}
