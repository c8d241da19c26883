//! Persisting a finished canvas to disk.

use std::fs;
use std::path::Path;

use topo_common::{TopoError, TopoResult};
use tracing::info;

use crate::canvas::Canvas;

/// Image file format, chosen from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> TopoResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| {
                TopoError::UnsupportedFormat(format!("no file extension on {}", path.display()))
            })?;

        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "bmp" => Ok(OutputFormat::Bmp),
            "tif" | "tiff" => Ok(OutputFormat::Tiff),
            other => Err(TopoError::UnsupportedFormat(other.to_string())),
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
            OutputFormat::Bmp => image::ImageFormat::Bmp,
            OutputFormat::Tiff => image::ImageFormat::Tiff,
        }
    }
}

/// Encode `canvas` in the format implied by `path` and write it.
///
/// PNG goes through the crate's own encoder; other formats use `image`.
/// Parent directories are created as needed.
pub fn save_canvas(canvas: &Canvas, path: &Path) -> TopoResult<()> {
    let format = OutputFormat::from_path(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match format {
        OutputFormat::Png => fs::write(path, canvas.to_png()?)?,
        other => image::save_buffer_with_format(
            path,
            &canvas.to_rgb(),
            canvas.width(),
            canvas.height(),
            image::ColorType::Rgb8,
            other.image_format(),
        )
        .map_err(|e| TopoError::RenderError(format!("{:?} encoding failed: {}", other, e)))?,
    }

    info!(
        path = %path.display(),
        width = canvas.width(),
        height = canvas.height(),
        format = ?format,
        "Heatmap written"
    );
    Ok(())
}
