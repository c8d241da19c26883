//! Grid-to-raster mapping: one filled rectangle per elevation sample.

use topo_common::{GridShape, Sample, TopoError, TopoResult};
use tracing::debug;

use crate::canvas::{Canvas, PixelRect};
use crate::gradient::{elevation_color, ColorMode};

/// Pixel footprint of each grid cell on a `width` x `height` image.
///
/// Cell sizes are real-valued; corners are truncated toward zero when a
/// cell is turned into pixels, so cells tile the image without gaps or
/// overlap. When `width / columns` does not multiply back exactly, the
/// last column (or row) may stop a pixel short of the edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub shape: GridShape,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl CellGeometry {
    pub fn new(shape: GridShape, width: u32, height: u32) -> Self {
        Self {
            shape,
            pixel_width: width as f64 / shape.columns as f64,
            pixel_height: height as f64 / shape.rows as f64,
        }
    }

    /// Rectangle `(col * pw, row * ph) - ((col + 1) * pw, (row + 1) * ph)`
    /// truncated to pixels.
    pub fn cell_rect(&self, row: usize, col: usize) -> PixelRect {
        let x0 = col as f64 * self.pixel_width;
        let y0 = row as f64 * self.pixel_height;
        let x1 = (col + 1) as f64 * self.pixel_width;
        let y1 = (row + 1) as f64 * self.pixel_height;
        PixelRect::new(x0 as u32, y0 as u32, x1 as u32, y1 as u32)
    }
}

/// One grid cell paired with its sample and pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell<'a> {
    pub row: usize,
    pub col: usize,
    pub sample: &'a Sample,
    pub rect: PixelRect,
}

/// Lay out every sample as a cell, in row-major order.
pub fn cells(samples: &[Sample], width: u32, height: u32) -> TopoResult<Vec<Cell<'_>>> {
    check_dimensions(width, height)?;
    let shape = GridShape::from_samples(samples)?;
    let geometry = CellGeometry::new(shape, width, height);

    debug!(
        columns = shape.columns,
        rows = shape.rows,
        pixel_width = geometry.pixel_width,
        pixel_height = geometry.pixel_height,
        "Grid shape discovered"
    );

    let mut cells = Vec::with_capacity(shape.len());
    for row in 0..shape.rows {
        for col in 0..shape.columns {
            cells.push(Cell {
                row,
                col,
                sample: &samples[shape.index(row, col)],
                rect: geometry.cell_rect(row, col),
            });
        }
    }
    Ok(cells)
}

/// Render samples as an elevation heatmap.
///
/// Each cell is filled with the gradient color of its sample, clamped to
/// valid channel values. Fails without producing a canvas if the samples
/// do not form a complete rectangular grid.
pub fn rasterize(samples: &[Sample], width: u32, height: u32, mode: ColorMode) -> TopoResult<Canvas> {
    let cells = cells(samples, width, height)?;
    let mut canvas = Canvas::new(width, height);

    let mut out_of_range = 0usize;
    for cell in &cells {
        let raw = elevation_color(cell.sample.elevation, mode);
        if !raw.is_in_range() {
            out_of_range += 1;
        }
        canvas.fill_rect(&cell.rect, raw.clamped());
    }

    if out_of_range > 0 {
        debug!(
            cells = out_of_range,
            ?mode,
            "Gradient channels outside 0..=255 were clamped"
        );
    }

    Ok(canvas)
}

fn check_dimensions(width: u32, height: u32) -> TopoResult<()> {
    if width == 0 {
        return Err(TopoError::invalid_parameter("width", "must be at least 1 pixel"));
    }
    if height == 0 {
        return Err(TopoError::invalid_parameter("height", "must be at least 1 pixel"));
    }
    Ok(())
}
