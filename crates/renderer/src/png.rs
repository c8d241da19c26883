//! PNG encoding for canvas pixel data.
//!
//! Supports two encoding modes:
//! - **Indexed PNG (color type 3)**: used when the image has ≤256 unique
//!   colors. Heatmaps of modest grids, and every grayscale map, fit.
//! - **RGB PNG (color type 2)**: fallback for images with more colors.
//!
//! Input is RGBA (4 bytes per pixel) as held by [`crate::Canvas`]; canvases
//! are opaque, so alpha is not written.

use rayon::prelude::*;
use std::collections::HashMap;
use std::io::Write;

use topo_common::{TopoError, TopoResult};

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

const COLOR_TYPE_RGB: u8 = 2;
const COLOR_TYPE_INDEXED: u8 = 3;

type Palette = Vec<(u8, u8, u8)>;

/// Create a PNG image with automatic format selection.
///
/// - If ≤256 unique colors: indexed PNG
/// - Otherwise: RGB PNG
pub fn create_png_auto(rgba: &[u8], width: usize, height: usize) -> TopoResult<Vec<u8>> {
    check_buffer(rgba, width, height)?;
    let num_pixels = rgba.len() / 4;

    let palette_result = if num_pixels >= PARALLEL_THRESHOLD {
        extract_palette_parallel(rgba)
    } else {
        extract_palette_sequential(rgba)
    };

    match palette_result {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png(rgba, width, height),
    }
}

/// Create an RGB PNG (color type 2) from RGBA input.
pub fn create_png(rgba: &[u8], width: usize, height: usize) -> TopoResult<Vec<u8>> {
    check_buffer(rgba, width, height)?;

    let mut scanlines = Vec::with_capacity(height * (1 + width * 3));
    for row in rgba.chunks_exact(width * 4) {
        scanlines.push(0); // filter type: none
        for px in row.chunks_exact(4) {
            scanlines.extend_from_slice(&px[..3]);
        }
    }

    let mut png = start_png(width, height, COLOR_TYPE_RGB);
    write_chunk(&mut png, b"IDAT", &deflate(&scanlines)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Create an indexed PNG (color type 3) from a palette and one index per pixel.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8)],
    indices: &[u8],
) -> TopoResult<Vec<u8>> {
    check_dimensions(width, height)?;
    if indices.len() != width * height {
        return Err(TopoError::RenderError(format!(
            "expected {} palette indices, got {}",
            width * height,
            indices.len()
        )));
    }

    let mut png = start_png(width, height, COLOR_TYPE_INDEXED);

    let plte: Vec<u8> = palette.iter().flat_map(|&(r, g, b)| [r, g, b]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    let mut scanlines = Vec::with_capacity(height * (1 + width));
    for row in indices.chunks_exact(width) {
        scanlines.push(0);
        scanlines.extend_from_slice(row);
    }
    write_chunk(&mut png, b"IDAT", &deflate(&scanlines)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn check_dimensions(width: usize, height: usize) -> TopoResult<()> {
    if width == 0 || height == 0 {
        return Err(TopoError::RenderError(format!(
            "cannot encode {}x{} image",
            width, height
        )));
    }
    Ok(())
}

fn check_buffer(rgba: &[u8], width: usize, height: usize) -> TopoResult<()> {
    check_dimensions(width, height)?;
    if rgba.len() != width * height * 4 {
        return Err(TopoError::RenderError(format!(
            "expected {} RGBA bytes for {}x{}, got {}",
            width * height * 4,
            width,
            height,
            rgba.len()
        )));
    }
    Ok(())
}

/// Signature plus IHDR for an 8-bit image.
fn start_png(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(color_type);
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr);
    png
}

/// Pack RGB bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_rgb(px: &[u8]) -> u32 {
    (px[0] as u32) | ((px[1] as u32) << 8) | ((px[2] as u32) << 16)
}

#[inline(always)]
fn unpack_rgb(packed: u32) -> (u8, u8, u8) {
    (packed as u8, (packed >> 8) as u8, (packed >> 16) as u8)
}

/// Sequential palette extraction for small images.
fn extract_palette_sequential(rgba: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(rgba.len() / 4);

    for px in rgba.chunks_exact(4) {
        let packed = pack_rgb(px);
        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push((px[0], px[1], px[2]));
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Parallel palette extraction for larger images.
///
/// Unique colors are collected per chunk, merged, then pixels are mapped to
/// palette indices in a second parallel pass.
fn extract_palette_parallel(rgba: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let chunk_pixels = (rgba.len() / 4 / rayon::current_num_threads()).max(256);

    let unique: Vec<u32> = rgba
        .par_chunks(chunk_pixels * 4)
        .flat_map_iter(|chunk| {
            let mut local: HashMap<u32, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE);
            for px in chunk.chunks_exact(4) {
                local.insert(pack_rgb(px), ());
                // Early exit if we definitely have too many colors
                if local.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            local.into_keys()
        })
        .collect();

    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    for packed in unique {
        if !color_to_index.contains_key(&packed) {
            if palette.len() >= MAX_PALETTE_SIZE {
                return None;
            }
            color_to_index.insert(packed, palette.len() as u8);
            palette.push(unpack_rgb(packed));
        }
    }

    let indices: Vec<u8> = rgba
        .par_chunks_exact(4)
        .map(|px| color_to_index.get(&pack_rgb(px)).copied().unwrap_or(0))
        .collect();

    Some((palette, indices))
}

/// Write a PNG chunk: length, type, data, CRC over type and data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

fn deflate(scanlines: &[u8]) -> TopoResult<Vec<u8>> {
    let compress = || -> std::io::Result<Vec<u8>> {
        let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
        encoder.write_all(scanlines)?;
        encoder.finish()
    };
    compress().map_err(|e| TopoError::RenderError(format!("IDAT compression failed: {}", e)))
}
