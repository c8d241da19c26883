//! Elevation heatmap rendering.
//!
//! - `gradient`: elevation-to-color bands (relief and grayscale)
//! - `raster`: grid cell geometry and the rasterizer
//! - `canvas`: the RGBA pixel buffer being painted
//! - `png` / `output`: encoding and writing the finished image

pub mod canvas;
pub mod gradient;
pub mod output;
pub mod png;
pub mod raster;

pub use canvas::{Canvas, PixelRect};
pub use gradient::{elevation_color, Color, ColorMode, ElevationBand, RawColor};
pub use output::{save_canvas, OutputFormat};
pub use raster::{cells, rasterize, Cell, CellGeometry};
