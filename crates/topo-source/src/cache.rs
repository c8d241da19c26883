//! On-disk cache of raw query results.
//!
//! One file per region, named by [`TopoRegion::cache_file_name`]. The JSON is
//! stored exactly as the service returned it. Writes go to a `.partial` file
//! first and are renamed into place, so a reader never sees half a response.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use topo_common::{TopoError, TopoRegion, TopoResult};
use tracing::{debug, info, warn};

use crate::provider::TopoSource;

/// Directory of cached query results.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the result for `region` lives.
    pub fn path_for(&self, region: &TopoRegion) -> PathBuf {
        self.dir.join(region.cache_file_name())
    }

    /// Cached JSON for `region`, or `None` on a miss.
    ///
    /// An unreadable entry counts as a miss.
    pub async fn read(&self, region: &TopoRegion) -> Option<String> {
        let path = self.path_for(region);
        match tokio::fs::read_to_string(&path).await {
            Ok(json) => {
                debug!(path = %path.display(), "Cache hit");
                Some(json)
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Cache miss");
                None
            }
        }
    }

    /// Store `json` for `region`, replacing any previous entry.
    pub async fn write(&self, region: &TopoRegion, json: &str) -> TopoResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            TopoError::CacheError(format!("creating {}: {}", self.dir.display(), e))
        })?;

        let path = self.path_for(region);
        let temp_path = path.with_extension("json.partial");

        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|e| TopoError::CacheError(format!("writing {}: {}", temp_path.display(), e)))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| TopoError::CacheError(format!("renaming {}: {}", temp_path.display(), e)))?;

        debug!(path = %path.display(), bytes = json.len(), "Cache entry written");
        Ok(path)
    }
}

/// A source that consults a [`FileCache`] before asking `inner`.
///
/// Fresh results are written back to the cache. A failed write is logged
/// and the data still returned.
pub struct CachedSource<S> {
    cache: FileCache,
    inner: S,
}

impl<S: TopoSource> CachedSource<S> {
    pub fn new(cache: FileCache, inner: S) -> Self {
        Self { cache, inner }
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: TopoSource> TopoSource for CachedSource<S> {
    async fn fetch_json(&self, region: &TopoRegion) -> TopoResult<String> {
        if let Some(json) = self.cache.read(region).await {
            info!(key = %region.cache_key(), "Using cached topography");
            return Ok(json);
        }

        let json = self.inner.fetch_json(region).await?;

        if let Err(e) = self.cache.write(region, &json).await {
            warn!(key = %region.cache_key(), error = %e, "Failed to cache topography");
        }
        Ok(json)
    }
}

#[async_trait]
impl<T: TopoSource + ?Sized> TopoSource for Box<T> {
    async fn fetch_json(&self, region: &TopoRegion) -> TopoResult<String> {
        (**self).fetch_json(region).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_uses_cache_key() {
        let cache = FileCache::new("/var/cache/topo");
        let region = TopoRegion::new(57.0, 60.0, 60, 22.0, 28.5, 60);
        assert_eq!(
            cache.path_for(&region),
            PathBuf::from("/var/cache/topo/topo_57-60-60_22-28.5-60.json")
        );
    }
}
