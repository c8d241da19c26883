//! Shape discovery for row-major sample grids.

use serde::{Deserialize, Serialize};

use crate::error::{TopoError, TopoResult};
use crate::sample::Sample;

/// Dimensions of a regular grid stored as a flat, row-major sample list.
///
/// Samples are ordered by latitude, then longitude. A row is a run of
/// samples sharing one latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    /// Number of samples per row (longitude direction)
    pub columns: usize,
    /// Number of rows (latitude direction)
    pub rows: usize,
}

impl GridShape {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    /// Infer the grid shape from a flat sample list.
    ///
    /// The column count is the length of the leading run of samples whose
    /// latitude equals the first sample's; the row count is the total
    /// length divided by that. The list must split evenly into rows, each
    /// row must hold a single finite latitude, and row latitudes must run
    /// strictly in one direction so every latitude forms one contiguous run.
    pub fn from_samples(samples: &[Sample]) -> TopoResult<Self> {
        let first = samples.first().ok_or(TopoError::EmptyGrid)?;

        if let Some(i) = samples.iter().position(|s| !s.latitude.is_finite()) {
            return Err(TopoError::MalformedGrid(format!(
                "sample {} has non-finite latitude {}",
                i, samples[i].latitude
            )));
        }

        let columns = samples
            .iter()
            .take_while(|s| s.latitude == first.latitude)
            .count();

        if samples.len() % columns != 0 {
            return Err(TopoError::MalformedGrid(format!(
                "{} samples do not divide into rows of {}",
                samples.len(),
                columns
            )));
        }

        let shape = Self::new(columns, samples.len() / columns);
        shape.check_rows(samples)?;
        Ok(shape)
    }

    fn check_rows(&self, samples: &[Sample]) -> TopoResult<()> {
        let mut previous: Option<f64> = None;
        let mut descending: Option<bool> = None;

        for (row, chunk) in samples.chunks(self.columns).enumerate() {
            let latitude = chunk[0].latitude;

            if let Some(col) = chunk.iter().position(|s| s.latitude != latitude) {
                return Err(TopoError::MalformedGrid(format!(
                    "row {} mixes latitudes {} and {} (column {})",
                    row, latitude, chunk[col].latitude, col
                )));
            }

            if let Some(prev) = previous {
                if latitude == prev {
                    return Err(TopoError::MalformedGrid(format!(
                        "rows {} and {} share latitude {}",
                        row - 1,
                        row,
                        latitude
                    )));
                }
                // Direction is fixed by the first pair of rows
                let down = latitude < prev;
                match descending {
                    None => descending = Some(down),
                    Some(d) if d != down => {
                        return Err(TopoError::MalformedGrid(format!(
                            "row {} latitude {} breaks the {} row order",
                            row,
                            latitude,
                            if d { "north-to-south" } else { "south-to-north" }
                        )));
                    }
                    Some(_) => {}
                }
            }
            previous = Some(latitude);
        }

        Ok(())
    }

    /// Flat index of the sample at `(row, col)`.
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.columns + col
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }
}
