//! Fixed-size RGBA pixel buffer painted one rectangle at a time.

use std::path::Path;

use topo_common::TopoResult;

use crate::gradient::Color;
use crate::output;
use crate::png;

/// Pixel rectangle, half-open: covers `x0..x1` and `y0..y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// RGBA canvas, 4 bytes per pixel, row-major. Starts opaque black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        for alpha in pixels.iter_mut().skip(3).step_by(4) {
            *alpha = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill `rect` with `color`, clipped to the canvas.
    pub fn fill_rect(&mut self, rect: &PixelRect, color: Color) {
        let x1 = rect.x1.min(self.width);
        let y1 = rect.y1.min(self.height);
        if rect.x0 >= x1 || rect.y0 >= y1 {
            return;
        }

        let rgba = [color.r, color.g, color.b, color.a];
        let stride = self.width as usize * 4;
        for y in rect.y0..y1 {
            let row_start = y as usize * stride;
            let span = &mut self.pixels[row_start + rect.x0 as usize * 4..row_start + x1 as usize * 4];
            for px in span.chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[idx..idx + 4];
        Some(Color::new(px[0], px[1], px[2], px[3]))
    }

    /// Raw RGBA bytes.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// RGB bytes with alpha dropped.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> TopoResult<Vec<u8>> {
        png::create_png_auto(&self.pixels, self.width as usize, self.height as usize)
    }

    /// Write the canvas to `path`; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> TopoResult<()> {
        output::save_canvas(self, path.as_ref())
    }
}
