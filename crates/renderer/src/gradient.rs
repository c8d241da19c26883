//! Elevation-to-color gradient for topography heatmaps.
//!
//! The relief gradient is piecewise linear over six bands. Channel values
//! are computed in signed arithmetic and truncated toward zero without
//! clamping, so extreme elevations (and the bottom of the plains band)
//! produce values outside 0..=255. [`RawColor::clamped`] is the separate
//! step that makes a color paintable.

use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of the lowland band in meters.
pub const LOWLAND_TOP: f64 = 150.0;
/// Upper bound (exclusive) of the plains band in meters.
pub const PLAINS_TOP: f64 = 650.0;
/// Upper bound (exclusive) of the hills band in meters.
pub const HILLS_TOP: f64 = 1250.0;

/// Grayscale base level for sea level.
const GRAY_BASE: f64 = 64.0;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }
}

/// Unclamped gradient output. Channels may be negative or exceed 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawColor {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl RawColor {
    pub fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    fn gray(level: i32) -> Self {
        Self::new(level, level, level)
    }

    /// Truncate each channel toward zero.
    fn truncate(r: f64, g: f64, b: f64) -> Self {
        Self::new(r as i32, g as i32, b as i32)
    }

    /// Whether every channel already lies in 0..=255.
    pub fn is_in_range(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0..=255).contains(c))
    }

    /// Saturate each channel to 0..=255, producing an opaque color.
    pub fn clamped(&self) -> Color {
        let clamp = |c: i32| c.clamp(0, 255) as u8;
        Color::rgb(clamp(self.r), clamp(self.g), clamp(self.b))
    }
}

impl From<(i32, i32, i32)> for RawColor {
    fn from((r, g, b): (i32, i32, i32)) -> Self {
        Self::new(r, g, b)
    }
}

/// Rendering mode selected by the grayscale flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Color,
    Grayscale,
}

impl ColorMode {
    pub fn from_grayscale(grayscale: bool) -> Self {
        if grayscale {
            ColorMode::Grayscale
        } else {
            ColorMode::Color
        }
    }
}

/// Contiguous elevation range with its own color formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationBand {
    /// v < 0
    DeepWater,
    /// v == 0
    SeaLevel,
    /// 0 < v < 150
    Lowland,
    /// 150 <= v < 650
    Plains,
    /// 650 <= v < 1250
    Hills,
    /// v >= 1250
    Mountains,
}

impl ElevationBand {
    pub fn classify(elevation: f64) -> Self {
        match elevation {
            v if v < 0.0 => ElevationBand::DeepWater,
            v if v == 0.0 => ElevationBand::SeaLevel,
            v if v < LOWLAND_TOP => ElevationBand::Lowland,
            v if v < PLAINS_TOP => ElevationBand::Plains,
            v if v < HILLS_TOP => ElevationBand::Hills,
            _ => ElevationBand::Mountains,
        }
    }
}

/// Color for an elevation in meters.
pub fn elevation_color(elevation: f64, mode: ColorMode) -> RawColor {
    match mode {
        ColorMode::Grayscale => grayscale_color(elevation),
        ColorMode::Color => relief_color(elevation),
    }
}

/// Gray level `64 - |v|` below sea level and `64 + |v|` otherwise.
///
/// Not a linear normalization: -10 and +10 land 20 levels apart.
pub fn grayscale_color(elevation: f64) -> RawColor {
    let level = if elevation < 0.0 {
        GRAY_BASE - elevation.abs()
    } else {
        GRAY_BASE + elevation.abs()
    };
    RawColor::gray(level as i32)
}

/// Six-band relief gradient: blue water, green lowland and plains,
/// yellow hills fading to brown mountains.
pub fn relief_color(elevation: f64) -> RawColor {
    let v = elevation;
    match ElevationBand::classify(v) {
        // -12000 m bottoms out near 55
        ElevationBand::DeepWater => RawColor::truncate(0.0, 0.0, 255.0 + v / 60.0),
        ElevationBand::SeaLevel => RawColor::new(0, 0, 0),
        // ends at (50, 255, 0)
        ElevationBand::Lowland => RawColor::truncate(v / 3.0, 195.0 + 0.4 * v, 150.0 - v),
        // red is negative below 500 m
        ElevationBand::Plains => RawColor::truncate(0.3 * (v - 500.0), 255.0, 0.0),
        ElevationBand::Hills => {
            RawColor::truncate(200.0, 255.0 - (v - 650.0) / 6.0, 0.083333 * (v - 650.0))
        }
        ElevationBand::Mountains => {
            let d = v - HILLS_TOP;
            RawColor::truncate(200.0 - d * 0.005926, 155.0 - d * 0.011852, 50.0 - d * 0.00444)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_is_toward_zero() {
        // 0.3 * (155 - 500) = -103.5 -> -103, not -104
        assert_eq!(relief_color(155.0).r, -103);
        assert_eq!(relief_color(149.9).r, 49);
    }

    #[test]
    fn test_clamped_saturates() {
        let raw = RawColor::new(-105, 300, 17);
        assert!(!raw.is_in_range());
        assert_eq!(raw.clamped(), Color::rgb(0, 255, 17));
        assert!(RawColor::new(0, 255, 1).is_in_range());
    }

    #[test]
    fn test_color_mode_from_flag() {
        assert_eq!(ColorMode::from_grayscale(true), ColorMode::Grayscale);
        assert_eq!(ColorMode::from_grayscale(false), ColorMode::Color);
        assert_eq!(ColorMode::default(), ColorMode::Color);
    }
}
