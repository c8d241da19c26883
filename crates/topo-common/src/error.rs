//! Error types for topography fetching and rendering.

use thiserror::Error;

/// Result type alias using TopoError.
pub type TopoResult<T> = Result<T, TopoError>;

/// Primary error type for topography operations.
#[derive(Debug, Error)]
pub enum TopoError {
    // === Request Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Requested format not supported: {0}")]
    UnsupportedFormat(String),

    // === Data Errors ===
    #[error("Grid contains no samples")]
    EmptyGrid,

    #[error("Malformed grid: {0}")]
    MalformedGrid(String),

    #[error("Data not available: {0}")]
    DataNotAvailable(String),

    #[error("Failed to read data: {0}")]
    DataReadError(String),

    #[error("Invalid topography JSON: {0}")]
    ParseError(String),

    // === Source Errors ===
    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Upstream request failed: {0}")]
    UpstreamError(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl TopoError {
    /// Shorthand for an `InvalidParameter` error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether the error means "the source had nothing for us" rather than a bug
    /// or bad input.
    pub fn is_absence(&self) -> bool {
        matches!(self, TopoError::DataNotAvailable(_) | TopoError::EmptyGrid)
    }
}

impl From<std::io::Error> for TopoError {
    fn from(err: std::io::Error) -> Self {
        TopoError::DataReadError(err.to_string())
    }
}

impl From<serde_json::Error> for TopoError {
    fn from(err: serde_json::Error) -> Self {
        TopoError::ParseError(err.to_string())
    }
}
