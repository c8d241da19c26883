//! Elevation samples and the ERDDAP JSON table they arrive in.

use serde::{Deserialize, Serialize};

use crate::error::{TopoError, TopoResult};

/// One (latitude, longitude, elevation) observation.
///
/// Serialized as a 3-element array, which is how ERDDAP emits table rows:
/// `[59.4, 24.75, 38]`. Elevation is in meters; integer values from the
/// service are widened to `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64, f64)", into = "(f64, f64, f64)")]
pub struct Sample {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl Sample {
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }
}

impl From<(f64, f64, f64)> for Sample {
    fn from((latitude, longitude, elevation): (f64, f64, f64)) -> Self {
        Self::new(latitude, longitude, elevation)
    }
}

impl From<Sample> for (f64, f64, f64) {
    fn from(s: Sample) -> Self {
        (s.latitude, s.longitude, s.elevation)
    }
}

/// ERDDAP `.json` table response. Column metadata is ignored; only `rows`
/// is needed for rendering.
#[derive(Debug, Deserialize)]
struct TableResponse {
    table: Table,
}

#[derive(Debug, Deserialize)]
struct Table {
    rows: Vec<Sample>,
}

/// Parse the JSON text returned by the topography service (or read back
/// from the cache) into samples, preserving document order.
pub fn parse_topo_json(json: &str) -> TopoResult<Vec<Sample>> {
    let response: TableResponse = serde_json::from_str(json)
        .map_err(|e| TopoError::ParseError(format!("table rows: {}", e)))?;
    Ok(response.table.rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_from_array() {
        let s: Sample = serde_json::from_str("[59.5, 24.75, 38]").unwrap();
        assert_eq!(s, Sample::new(59.5, 24.75, 38.0));
    }

    #[test]
    fn test_sample_to_array() {
        let json = serde_json::to_string(&Sample::new(1.0, 2.5, -3.0)).unwrap();
        assert_eq!(json, "[1.0,2.5,-3.0]");
    }

    #[test]
    fn test_parse_rows_only() {
        let samples = parse_topo_json(r#"{"table": {"rows": [[1, 2, 3], [1, 4, -5]]}}"#).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].elevation, -5.0);
    }

    #[test]
    fn test_parse_ignores_column_metadata() {
        let json = r#"{"table": {
            "columnNames": ["latitude", "longitude", "topo"],
            "columnTypes": ["double", "double", "short"],
            "columnUnits": ["degrees_north", "degrees_east", null],
            "rows": [[59.0, 24.0, 38]]
        }}"#;
        assert_eq!(parse_topo_json(json).unwrap(), vec![Sample::new(59.0, 24.0, 38.0)]);
    }

    #[test]
    fn test_parse_rejects_null_elevation() {
        let result = parse_topo_json(r#"{"table": {"rows": [[1, 2, null]]}}"#);
        assert!(matches!(result, Err(TopoError::ParseError(_))));
    }

    #[test]
    fn test_parse_rejects_missing_table() {
        let result = parse_topo_json(r#"{"rows": []}"#);
        assert!(matches!(result, Err(TopoError::ParseError(_))));
    }
}
