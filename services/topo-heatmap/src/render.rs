//! The per-map pipeline: validate, resolve strides, fetch, rasterize, save.

use std::path::PathBuf;
use std::time::Instant;

use renderer::rasterize;
use topo_common::{Sample, TopoError, TopoRegion, TopoResult};
use topo_source::TopoSource;
use tracing::{debug, info, instrument};

use crate::jobs::MapJob;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RenderedMap {
    pub output: PathBuf,
    pub region: TopoRegion,
    pub samples: usize,
}

/// Render one heatmap from `source` and write it to `job.output`.
///
/// Nothing is written unless every stage succeeds.
#[instrument(skip_all, fields(output = %job.output.display()))]
pub async fn generate_map(source: &dyn TopoSource, job: &MapJob) -> TopoResult<RenderedMap> {
    let start = Instant::now();
    job.validate()?;

    let region = job.region.resolve_strides(job.width, job.height);
    debug!(
        lat_stride = region.lat_stride,
        lon_stride = region.lon_stride,
        "Strides resolved"
    );

    let samples = source.fetch_samples(&region).await?;
    info!(count = samples.len(), key = %region.cache_key(), "Samples fetched");

    let count = samples.len();
    paint_and_save(samples, job).await?;

    info!(
        width = job.width,
        height = job.height,
        mode = ?job.mode(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Map rendered"
    );

    Ok(RenderedMap {
        output: job.output.clone(),
        region,
        samples: count,
    })
}

/// Rasterize and write the file on the blocking pool; both are CPU or
/// `std::fs` bound.
async fn paint_and_save(samples: Vec<Sample>, job: &MapJob) -> TopoResult<()> {
    let (width, height, mode) = (job.width, job.height, job.mode());
    let output = job.output.clone();

    tokio::task::spawn_blocking(move || {
        let canvas = rasterize(&samples, width, height, mode)?;
        canvas.save(&output)
    })
    .await
    .map_err(|e| TopoError::InternalError(format!("render task failed: {}", e)))?
}
