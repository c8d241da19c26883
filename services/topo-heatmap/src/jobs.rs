//! Map job definitions and the YAML batch file loader.
//!
//! A batch file lists the maps to render:
//!
//! ```yaml
//! cache_dir: ${TOPO_CACHE_DIR:-/var/cache/topo}
//! maps:
//!   - output: out/estonia.png
//!     width: 1200
//!     height: 800
//!     region: { min_lat: 57, max_lat: 60, min_lon: 21, max_lon: 29 }
//! ```
//!
//! `${VAR}` and `${VAR:-default}` are replaced from the environment before
//! the YAML is parsed.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use renderer::{ColorMode, OutputFormat};
use serde::Deserialize;
use topo_common::{TopoError, TopoRegion, TopoResult};

// ============================================================================
// Job types
// ============================================================================

/// One heatmap to render.
#[derive(Debug, Clone, Deserialize)]
pub struct MapJob {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub grayscale: bool,
    pub region: TopoRegion,
}

impl MapJob {
    pub fn mode(&self) -> ColorMode {
        ColorMode::from_grayscale(self.grayscale)
    }

    /// Check everything that can be checked without touching the network.
    pub fn validate(&self) -> TopoResult<()> {
        if self.width == 0 {
            return Err(TopoError::invalid_parameter("width", "must be at least 1"));
        }
        if self.height == 0 {
            return Err(TopoError::invalid_parameter("height", "must be at least 1"));
        }
        self.region.validate()?;
        OutputFormat::from_path(&self.output)?;
        Ok(())
    }
}

/// Root of a batch file.
#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub erddap_url: Option<String>,
    pub maps: Vec<MapJob>,
}

// ============================================================================
// Loading
// ============================================================================

/// Load, expand and validate a batch file.
pub fn load_jobs<P: AsRef<Path>>(path: P) -> Result<JobsConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read jobs file: {}", path.display()))?;
    parse_jobs(&content, |name| std::env::var(name).ok())
        .with_context(|| format!("Invalid jobs file: {}", path.display()))
}

fn parse_jobs<F>(content: &str, lookup: F) -> Result<JobsConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let expanded = expand_vars(content, lookup)?;
    let config: JobsConfig = serde_yaml::from_str(&expanded).context("Failed to parse YAML")?;
    validate_jobs(&config)?;
    Ok(config)
}

/// Substitute `${VAR}` and `${VAR:-default}` in the raw file text, before
/// YAML parsing, so any field can use them: output paths, sizes, region
/// bounds, `cache_dir`, `erddap_url`.
fn expand_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').with_context(|| {
            format!(
                "Unclosed ${{ at byte {} of jobs file",
                content.len() - rest.len() + start
            )
        })?;
        result.push_str(&resolve_var(&after[..end], &lookup)?);
        rest = &after[end + 1..];
    }
    result.push_str(rest);

    Ok(result)
}

/// Resolve `VAR` or `VAR:-default`. An empty value falls back to the default.
fn resolve_var<F>(expr: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match expr.split_once(":-") {
        Some((name, default)) => Ok(lookup(name.trim())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())),
        None => lookup(expr.trim())
            .with_context(|| format!("Jobs file uses unset variable {}", expr.trim())),
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate_jobs(config: &JobsConfig) -> Result<()> {
    anyhow::ensure!(!config.maps.is_empty(), "Jobs file must list at least one map");

    for (i, job) in config.maps.iter().enumerate() {
        job.validate()
            .with_context(|| format!("maps[{}] ({})", i, job.output.display()))?;
    }

    if let Some(url) = &config.erddap_url {
        anyhow::ensure!(
            url.starts_with("http://") || url.starts_with("https://"),
            "erddap_url must be an http(s) URL: {}",
            url
        );
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_vars(_: &str) -> Option<String> {
        None
    }

    const JOBS_YAML: &str = r#"
cache_dir: /tmp/topo-cache
maps:
  - output: maps/estonia.png
    width: 1200
    height: 800
    region: { min_lat: 57, max_lat: 60, lat_stride: 1, min_lon: 21, max_lon: 29, lon_stride: 1 }
  - output: maps/europe_bw.jpg
    width: 1800
    height: 1200
    grayscale: true
    region:
      min_lat: 30
      max_lat: 80
      min_lon: -25
      max_lon: 70
"#;

    #[test]
    fn test_parse_jobs() {
        let config = parse_jobs(JOBS_YAML, no_vars).unwrap();
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/topo-cache")));
        assert!(config.erddap_url.is_none());
        assert_eq!(config.maps.len(), 2);

        let estonia = &config.maps[0];
        assert_eq!(estonia.mode(), ColorMode::Color);
        assert_eq!(estonia.region, TopoRegion::new(57.0, 60.0, 1, 21.0, 29.0, 1));

        let europe = &config.maps[1];
        assert_eq!(europe.mode(), ColorMode::Grayscale);
        assert!(!europe.region.is_resolved());
    }

    #[test]
    fn test_invalid_map_rejected_before_fetch() {
        let yaml = r#"
maps:
  - output: ok.png
    width: 10
    height: 10
    region: { min_lat: 0, max_lat: 1, min_lon: 0, max_lon: 1 }
  - output: flipped.png
    width: 10
    height: 10
    region: { min_lat: 5, max_lat: 1, min_lon: 0, max_lon: 1 }
"#;
        let err = parse_jobs(yaml, no_vars).unwrap_err();
        assert!(format!("{:#}", err).contains("maps[1] (flipped.png)"));
    }

    #[test]
    fn test_zero_size_and_bad_format_rejected() {
        let base = MapJob {
            output: PathBuf::from("a.png"),
            width: 10,
            height: 10,
            grayscale: false,
            region: TopoRegion::new(0.0, 1.0, 0, 0.0, 1.0, 0),
        };
        assert!(base.validate().is_ok());

        let zero = MapJob { height: 0, ..base.clone() };
        assert!(matches!(zero.validate(), Err(TopoError::InvalidParameter { .. })));

        let gif = MapJob { output: PathBuf::from("a.gif"), ..base };
        assert!(matches!(gif.validate(), Err(TopoError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_empty_map_list_rejected() {
        assert!(parse_jobs("maps: []", no_vars).is_err());
    }

    #[test]
    fn test_bad_erddap_url_rejected() {
        let yaml = r#"
erddap_url: ftp://example.org/erddap
maps:
  - output: a.png
    width: 1
    height: 1
    region: { min_lat: 0, max_lat: 1, min_lon: 0, max_lon: 1 }
"#;
        assert!(parse_jobs(yaml, no_vars).is_err());
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_expand_vars_simple() {
        let result = expand_vars("prefix_${OUT_DIR}_suffix", vars(&[("OUT_DIR", "render")])).unwrap();
        assert_eq!(result, "prefix_render_suffix");
    }

    #[test]
    fn test_expand_vars_with_default() {
        let result = expand_vars("value_${MISSING:-default}_end", no_vars).unwrap();
        assert_eq!(result, "value_default_end");
    }

    #[test]
    fn test_expand_vars_empty_value_uses_default() {
        let result = expand_vars("${WIDTH:-800}", vars(&[("WIDTH", "")])).unwrap();
        assert_eq!(result, "800");
    }

    #[test]
    fn test_expand_vars_set_value_overrides_default() {
        let result = expand_vars("${WIDTH:-800}", vars(&[("WIDTH", "1024")])).unwrap();
        assert_eq!(result, "1024");
    }

    #[test]
    fn test_expand_vars_missing_required() {
        let err = expand_vars("cache_dir: ${TOPO_CACHE}", no_vars).unwrap_err();
        assert!(err.to_string().contains("TOPO_CACHE"));
    }

    #[test]
    fn test_expand_vars_unclosed() {
        let err = expand_vars("width: ${WIDTH", no_vars).unwrap_err();
        assert!(err.to_string().contains("byte 7"));
    }

    #[test]
    fn test_expand_vars_leaves_plain_dollars() {
        let result = expand_vars("output: $HOME/a.png", no_vars).unwrap();
        assert_eq!(result, "output: $HOME/a.png");
    }

    #[test]
    fn test_expanded_values_reach_jobs() {
        let yaml = r#"
maps:
  - output: ${OUT_DIR:-out}/a.bmp
    width: ${WIDTH}
    height: 480
    region: { min_lat: ${SOUTH:-0}, max_lat: 1, min_lon: 0, max_lon: 1 }
"#;
        let config = parse_jobs(yaml, vars(&[("WIDTH", "640"), ("SOUTH", "-0.5")])).unwrap();
        assert_eq!(config.maps[0].width, 640);
        assert_eq!(config.maps[0].output, PathBuf::from("out/a.bmp"));
        assert_eq!(config.maps[0].region.min_lat, -0.5);
    }

    #[test]
    fn test_load_jobs_missing_file() {
        let err = load_jobs("/nonexistent/jobs.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read jobs file"));
    }
}
