//! The data-provider boundary between I/O and rendering.

use async_trait::async_trait;
use topo_common::{parse_topo_json, Sample, TopoError, TopoRegion, TopoResult};
use tracing::debug;

/// Anything that can produce topography JSON for a region.
///
/// Implementations return the service's JSON table text; parsing into
/// samples is shared.
#[async_trait]
pub trait TopoSource: Send + Sync {
    /// Raw JSON table for `region`. Strides must already be resolved.
    async fn fetch_json(&self, region: &TopoRegion) -> TopoResult<String>;

    /// Samples for `region`, in the order the service returned them.
    ///
    /// An empty table is reported as [`TopoError::DataNotAvailable`].
    async fn fetch_samples(&self, region: &TopoRegion) -> TopoResult<Vec<Sample>> {
        let json = self.fetch_json(region).await?;
        let samples = parse_topo_json(&json)?;
        if samples.is_empty() {
            return Err(TopoError::DataNotAvailable(format!(
                "no samples for {}",
                region.cache_key()
            )));
        }
        debug!(count = samples.len(), key = %region.cache_key(), "Samples parsed");
        Ok(samples)
    }
}
