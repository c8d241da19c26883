//! Synthetic elevation grids.
//!
//! All generators return samples in row-major order with one latitude per
//! row, north first, the way the topography service returns them.

use topo_common::Sample;

/// Build a `columns` x `rows` grid whose elevation is `f(row, col)`.
pub fn create_elevation_grid<F>(columns: usize, rows: usize, f: F) -> Vec<Sample>
where
    F: Fn(usize, usize) -> f64,
{
    let mut samples = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        let latitude = 60.0 - row as f64 * 0.5;
        for col in 0..columns {
            let longitude = 20.0 + col as f64 * 0.5;
            samples.push(Sample::new(latitude, longitude, f(row, col)));
        }
    }
    samples
}

/// Each cell's elevation encodes its position: `row * 1000 + col`.
///
/// ```
/// use test_utils::create_indexed_grid;
///
/// let grid = create_indexed_grid(3, 2);
/// assert_eq!(grid.len(), 6);
/// assert_eq!(grid[4].elevation, 1001.0); // row 1, col 1
/// ```
pub fn create_indexed_grid(columns: usize, rows: usize) -> Vec<Sample> {
    create_elevation_grid(columns, rows, |row, col| (row * 1000 + col) as f64)
}

/// Coastline-like terrain: sea on the west edge rising to mountains in the
/// east, covering every gradient band.
pub fn create_coastal_grid(columns: usize, rows: usize) -> Vec<Sample> {
    create_elevation_grid(columns, rows, |row, col| {
        let x = col as f64 / columns.max(1) as f64;
        let y = row as f64 / rows.max(1) as f64;
        -2000.0 + x * 6000.0 + y * 300.0
    })
}

/// A grid where every sample has the same elevation.
pub fn create_flat_grid(columns: usize, rows: usize, elevation: f64) -> Vec<Sample> {
    create_elevation_grid(columns, rows, |_, _| elevation)
}
