//! Common test fixtures for topography tests.

use topo_common::{Sample, TopoRegion};

/// The 4-row, 3-column grid used to explain the cell geometry:
/// latitudes 10..16 step 2, longitudes 10..14 step 2.
///
/// Rendered at 100x100 the first cell is (0,0)-(33,25).
pub fn worked_example_samples() -> Vec<Sample> {
    let elevations = [1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 6.0, 9.0, 12.0, 1.0, 1.0, 3.0];
    elevations
        .iter()
        .enumerate()
        .map(|(i, &elevation)| {
            let row = (i / 3) as f64;
            let col = (i % 3) as f64;
            Sample::new(10.0 + 2.0 * row, 10.0 + 2.0 * col, elevation)
        })
        .collect()
}

/// A small ERDDAP griddap `.json` response: 2 rows x 3 columns, north first.
pub const ERDDAP_JSON_2X3: &str = r#"{
  "table": {
    "columnNames": ["latitude", "longitude", "topo"],
    "columnTypes": ["double", "double", "short"],
    "columnUnits": ["degrees_north", "degrees_east", "meters"],
    "rows": [
      [59.0, 24.0, 38],
      [59.0, 24.5, 52],
      [59.0, 25.0, -3],
      [58.5, 24.0, 0],
      [58.5, 24.5, 141],
      [58.5, 25.0, 318]
    ]
  }
}"#;

/// ERDDAP response with no rows.
pub const ERDDAP_JSON_EMPTY: &str = r#"{"table": {"columnNames": [], "rows": []}}"#;

/// Common query regions.
pub mod regions {
    use topo_common::TopoRegion;

    /// Estonia at one sample per dataset step.
    pub const ESTONIA: TopoRegion = TopoRegion {
        min_lat: 57.0,
        max_lat: 60.0,
        lat_stride: 1,
        min_lon: 24.0,
        max_lon: 27.0,
        lon_stride: 1,
    };

    /// Europe with strides left for auto resolution.
    pub const EUROPE_AUTO: TopoRegion = TopoRegion {
        min_lat: 30.0,
        max_lat: 80.0,
        lat_stride: 0,
        min_lon: -25.0,
        max_lon: 70.0,
        lon_stride: 0,
    };
}

/// Region matching [`ERDDAP_JSON_2X3`].
pub fn erddap_2x3_region() -> TopoRegion {
    TopoRegion::new(58.5, 59.0, 60, 24.0, 25.0, 60)
}
