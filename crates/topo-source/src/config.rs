//! Configuration for topography sources.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default ERDDAP server hosting the SRTM30 topography grid.
pub const DEFAULT_ERDDAP_URL: &str = "http://coastwatch.pfeg.noaa.gov/erddap";
/// SRTM30+ global topography, 30 arc-second grid.
pub const DEFAULT_DATASET: &str = "usgsCeSrtm30v6";
/// Grid variable holding elevation in meters.
pub const DEFAULT_VARIABLE: &str = "topo";

/// Where to fetch topography from and where to cache it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// ERDDAP server base URL (without `/griddap`).
    pub erddap_url: String,

    /// griddap dataset id.
    pub dataset: String,

    /// Variable to query.
    pub variable: String,

    /// Directory for cached query results.
    pub cache_dir: PathBuf,

    /// Skip the cache entirely.
    pub cache_disabled: bool,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            erddap_url: DEFAULT_ERDDAP_URL.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            variable: DEFAULT_VARIABLE.to_string(),
            cache_dir: PathBuf::from("."),
            cache_disabled: false,
            request_timeout_secs: 300,
        }
    }
}

impl SourceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ERDDAP_URL") {
            config.erddap_url = val;
        }

        if let Ok(val) = std::env::var("ERDDAP_DATASET") {
            config.dataset = val;
        }

        if let Ok(val) = std::env::var("TOPO_CACHE_DIR") {
            config.cache_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("TOPO_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.request_timeout_secs = secs;
            }
        }

        if let Ok(val) = std::env::var("TOPO_CACHE_DISABLED") {
            config.cache_disabled = matches!(val.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        config
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
