//! Tests for PNG encoding and writing canvases to disk.
//!
//! Encoded files are decoded again with the `image` crate to check they are
//! valid and carry the painted pixels.

use renderer::png::{create_png, create_png_auto, create_png_indexed};
use renderer::{rasterize, save_canvas, Canvas, ColorMode, OutputFormat};
use std::path::Path;
use test_utils::{create_coastal_grid, temp_dir, worked_example_samples};
use topo_common::TopoError;

/// Read the IHDR color type byte.
fn color_type(png: &[u8]) -> u8 {
    png[25]
}

fn decode_rgb(png: &[u8]) -> image::RgbImage {
    image::load_from_memory(png).expect("valid PNG").to_rgb8()
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_png_signature_and_ihdr() {
    let canvas = Canvas::new(7, 3);
    let png = canvas.to_png().unwrap();
    assert_eq!(&png[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    assert_eq!(&png[12..16], b"IHDR");
    assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 7);
    assert_eq!(u32::from_be_bytes([png[20], png[21], png[22], png[23]]), 3);
}

#[test]
fn test_heatmap_uses_indexed_png() {
    let canvas = rasterize(&worked_example_samples(), 100, 100, ColorMode::Color).unwrap();
    let png = canvas.to_png().unwrap();
    assert_eq!(color_type(&png), 3);

    let decoded = decode_rgb(&png);
    assert_eq!(decoded.dimensions(), (100, 100));
    let px = canvas.pixel(80, 60).unwrap();
    assert_eq!(decoded.get_pixel(80, 60).0, [px.r, px.g, px.b]);
}

#[test]
fn test_many_colors_fall_back_to_rgb() {
    let mut rgba = Vec::with_capacity(64 * 64 * 4);
    for i in 0..(64 * 64u32) {
        rgba.extend_from_slice(&[(i % 256) as u8, (i / 256) as u8, 7, 255]);
    }
    let png = create_png_auto(&rgba, 64, 64).unwrap();
    assert_eq!(color_type(&png), 2);

    let decoded = decode_rgb(&png);
    assert_eq!(decoded.get_pixel(5, 1).0, [69, 0, 7]);
}

#[test]
fn test_rgb_and_indexed_decode_identically() {
    let canvas = rasterize(&create_coastal_grid(20, 12), 120, 80, ColorMode::Color).unwrap();
    let rgba = canvas.as_rgba();

    let rgb = decode_rgb(&create_png(rgba, 120, 80).unwrap());
    let auto = decode_rgb(&create_png_auto(rgba, 120, 80).unwrap());
    assert_eq!(rgb, auto);
    assert_eq!(rgb.as_raw(), &canvas.to_rgb());
}

#[test]
fn test_buffer_size_mismatch() {
    assert!(matches!(
        create_png(&[0u8; 12], 2, 2),
        Err(TopoError::RenderError(_))
    ));
    assert!(matches!(
        create_png_indexed(2, 2, &[(0, 0, 0)], &[0, 0, 0]),
        Err(TopoError::RenderError(_))
    ));
    assert!(create_png_auto(&[], 0, 0).is_err());
}

// ============================================================================
// Writing to disk
// ============================================================================

#[test]
fn test_save_png_creates_parent_dirs() {
    let dir = temp_dir();
    let path = dir.path().join("maps/estonia/bw.png");
    let canvas = rasterize(&worked_example_samples(), 30, 40, ColorMode::Grayscale).unwrap();

    canvas.save(&path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (30, 40));
    assert_eq!(decoded.as_raw(), &canvas.to_rgb());
}

#[test]
fn test_save_bmp_is_lossless() {
    let dir = temp_dir();
    let path = dir.path().join("map.bmp");
    let canvas = rasterize(&create_coastal_grid(8, 8), 64, 64, ColorMode::Color).unwrap();

    save_canvas(&canvas, &path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(decoded.as_raw(), &canvas.to_rgb());
}

#[test]
fn test_save_jpeg_dimensions() {
    let dir = temp_dir();
    let path = dir.path().join("map.jpg");
    let canvas = rasterize(&create_coastal_grid(8, 8), 48, 32, ColorMode::Color).unwrap();

    save_canvas(&canvas, &path).unwrap();

    assert_eq!(OutputFormat::from_path(&path).unwrap(), OutputFormat::Jpeg);
    let decoded = image::open(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (48, 32));
}

#[test]
fn test_save_unsupported_extension_writes_nothing() {
    let dir = temp_dir();
    let path = dir.path().join("map.webp");
    let canvas = Canvas::new(4, 4);

    assert!(matches!(
        save_canvas(&canvas, &path),
        Err(TopoError::UnsupportedFormat(_))
    ));
    assert!(!Path::new(&path).exists());
}
