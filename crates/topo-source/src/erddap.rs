//! ERDDAP griddap client.
//!
//! Queries take the form
//! `{base}/griddap/{dataset}.json?{variable}[(maxLat):stride:(minLat)][(minLon):stride:(maxLon)]`.
//! Latitude is requested north to south so rows arrive top of the image
//! first. A stride of 120 is one degree on the SRTM30 grid.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use topo_common::{TopoError, TopoRegion, TopoResult};
use tracing::{info, instrument};

use crate::config::SourceConfig;
use crate::provider::TopoSource;

/// HTTP client for one ERDDAP griddap dataset.
pub struct ErddapClient {
    client: Client,
    base_url: String,
    dataset: String,
    variable: String,
}

impl ErddapClient {
    /// Create a client from source configuration.
    pub fn new(config: &SourceConfig) -> TopoResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TopoError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.erddap_url.trim_end_matches('/').to_string(),
            dataset: config.dataset.clone(),
            variable: config.variable.clone(),
        })
    }

    /// Query URL for `region`.
    pub fn query_url(&self, region: &TopoRegion) -> String {
        format!(
            "{}/griddap/{}.json?{}[({}):{}:({})][({}):{}:({})]",
            self.base_url,
            self.dataset,
            self.variable,
            region.max_lat,
            region.lat_stride,
            region.min_lat,
            region.min_lon,
            region.lon_stride,
            region.max_lon,
        )
    }
}

#[async_trait]
impl TopoSource for ErddapClient {
    #[instrument(skip(self), fields(key = %region.cache_key()))]
    async fn fetch_json(&self, region: &TopoRegion) -> TopoResult<String> {
        if !region.is_resolved() {
            return Err(TopoError::invalid_parameter(
                "stride",
                "strides must be resolved before querying",
            ));
        }

        let url = self.query_url(region);
        info!(url = %url, "Requesting topography");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TopoError::DataNotAvailable(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TopoError::UpstreamError(format!(
                "HTTP {} for {}",
                status, url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TopoError::DataReadError(format!("reading body from {}: {}", url, e)))?;

        info!(bytes = body.len(), "Topography received");
        Ok(body)
    }
}
