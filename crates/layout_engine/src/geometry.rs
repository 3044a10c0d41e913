//! Canonical surface geometry
//!
//! The announcement is laid out on an A4 sheet measured in CSS pixels
//! (96 per inch).

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// CSS pixels per millimetre
pub const CSS_PX_PER_MM: f32 = 96.0 / 25.4;

/// Canonical surface width: 210 mm at 96 dpi
pub const CANONICAL_WIDTH: u32 = 794;

/// Canonical surface height: 297 mm at 96 dpi
pub const CANONICAL_HEIGHT: u32 = 1123;

pub fn mm_to_px(mm: f32) -> f32 {
    mm * CSS_PX_PER_MM
}

/// Padding around the content box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

/// Size and padding of the surface the layout is computed on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    pub width: f32,
    /// The surface never gets shorter than this
    pub min_height: f32,
    pub padding: EdgeInsets,
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl SurfaceGeometry {
    /// A4 portrait with 2.5 cm vertical and 3 cm horizontal padding
    pub fn a4() -> Self {
        Self {
            width: CANONICAL_WIDTH as f32,
            min_height: CANONICAL_HEIGHT as f32,
            padding: EdgeInsets::symmetric(mm_to_px(25.0), mm_to_px(30.0)),
        }
    }

    pub fn content_x(&self) -> f32 {
        self.padding.left
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(LayoutError::InvalidGeometry(format!(
                "width must be positive, got {}",
                self.width
            )));
        }
        if !(self.min_height.is_finite() && self.min_height > 0.0) {
            return Err(LayoutError::InvalidGeometry(format!(
                "height must be positive, got {}",
                self.min_height
            )));
        }
        let p = &self.padding;
        if [p.top, p.right, p.bottom, p.left].iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(LayoutError::InvalidGeometry(
                "padding must be non-negative".to_string(),
            ));
        }
        if self.content_width() <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "horizontal padding {} leaves no room in width {}",
                p.left + p.right,
                self.width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_geometry() {
        let geometry = SurfaceGeometry::a4();
        assert_eq!(geometry.width, 794.0);
        assert_eq!(geometry.min_height, 1123.0);
        assert!((geometry.padding.top - 94.488).abs() < 0.01);
        assert!((geometry.padding.left - 113.386).abs() < 0.01);
        assert!((geometry.content_width() - 567.228).abs() < 0.01);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_invalid_geometry() {
        let mut geometry = SurfaceGeometry::a4();
        geometry.padding = EdgeInsets::symmetric(10.0, 400.0);
        assert!(matches!(
            geometry.validate(),
            Err(LayoutError::InvalidGeometry(_))
        ));

        geometry = SurfaceGeometry::a4();
        geometry.width = 0.0;
        assert!(geometry.validate().is_err());
    }
}
