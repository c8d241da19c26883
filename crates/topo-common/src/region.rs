//! Query region for the topography service.

use serde::{Deserialize, Serialize};

use crate::error::{TopoError, TopoResult};

/// Dataset index steps per degree. SRTM30 has a 30 arc-second spacing.
pub const STEPS_PER_DEGREE: f64 = 120.0;

/// A latitude/longitude window plus sampling strides.
///
/// Strides are index steps into the source dataset (120 per degree);
/// `0` means "derive from the output image size", see
/// [`TopoRegion::resolve_strides`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopoRegion {
    pub min_lat: f64,
    pub max_lat: f64,
    #[serde(default)]
    pub lat_stride: u32,
    pub min_lon: f64,
    pub max_lon: f64,
    #[serde(default)]
    pub lon_stride: u32,
}

impl TopoRegion {
    pub fn new(
        min_lat: f64,
        max_lat: f64,
        lat_stride: u32,
        min_lon: f64,
        max_lon: f64,
        lon_stride: u32,
    ) -> Self {
        Self {
            min_lat,
            max_lat,
            lat_stride,
            min_lon,
            max_lon,
            lon_stride,
        }
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Check the window is finite, non-empty and on the globe.
    pub fn validate(&self) -> TopoResult<()> {
        let coords = [self.min_lat, self.max_lat, self.min_lon, self.max_lon];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(TopoError::InvalidRegion(format!(
                "non-finite coordinate in {:?}",
                coords
            )));
        }
        if self.min_lat >= self.max_lat {
            return Err(TopoError::InvalidRegion(format!(
                "min_lat {} must be below max_lat {}",
                self.min_lat, self.max_lat
            )));
        }
        if self.min_lon >= self.max_lon {
            return Err(TopoError::InvalidRegion(format!(
                "min_lon {} must be below max_lon {}",
                self.min_lon, self.max_lon
            )));
        }
        if self.min_lat < -90.0 || self.max_lat > 90.0 {
            return Err(TopoError::InvalidRegion(format!(
                "latitude range {}..{} outside -90..90",
                self.min_lat, self.max_lat
            )));
        }
        if self.min_lon < -180.0 || self.max_lon > 180.0 {
            return Err(TopoError::InvalidRegion(format!(
                "longitude range {}..{} outside -180..180",
                self.min_lon, self.max_lon
            )));
        }
        Ok(())
    }

    /// Fill in zero strides so the query returns roughly one sample per
    /// output pixel along that axis.
    ///
    /// Latitude uses the image height, longitude the image width. There is
    /// no point in asking for more samples than there are pixels to paint.
    pub fn resolve_strides(&self, image_width: u32, image_height: u32) -> TopoRegion {
        let mut resolved = *self;
        if resolved.lat_stride == 0 {
            resolved.lat_stride = auto_stride(image_height, self.lat_span());
        }
        if resolved.lon_stride == 0 {
            resolved.lon_stride = auto_stride(image_width, self.lon_span());
        }
        resolved
    }

    /// True when both strides are set.
    pub fn is_resolved(&self) -> bool {
        self.lat_stride > 0 && self.lon_stride > 0
    }

    /// Key identifying this query, e.g. `topo_57-60-1_24-27-1`.
    pub fn cache_key(&self) -> String {
        format!(
            "topo_{}-{}-{}_{}-{}-{}",
            self.min_lat, self.max_lat, self.lat_stride, self.min_lon, self.max_lon, self.lon_stride
        )
    }

    /// File name of the cached query result.
    pub fn cache_file_name(&self) -> String {
        format!("{}.json", self.cache_key())
    }
}

fn auto_stride(pixels: u32, span_degrees: f64) -> u32 {
    let pixels_per_degree = pixels as f64 / span_degrees;
    let stride = (STEPS_PER_DEGREE / pixels_per_degree) as u32;
    stride.max(1)
}
