//! Common types shared across the topography heatmap crates.

pub mod error;
pub mod grid;
pub mod region;
pub mod sample;

pub use error::{TopoError, TopoResult};
pub use grid::GridShape;
pub use region::TopoRegion;
pub use sample::{parse_topo_json, Sample};
