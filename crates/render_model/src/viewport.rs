//! On-screen preview state
//!
//! The preview shrinks the canonical sheet to fit narrow viewports. That
//! scale only ever applies to what is shown on screen; exports pin it to 1
//! for the duration of a capture.

use layout_engine::CANONICAL_WIDTH;
use serde::{Deserialize, Serialize};

use crate::{RenderError, RenderedSurface, Result};

/// Preview scale and the export busy flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewState {
    scale: f64,
    busy: bool,
}

impl Default for PreviewState {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewState {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            busy: false,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RenderError::InvalidScale(scale));
        }
        self.scale = scale;
        Ok(())
    }

    /// Fit the canonical sheet to a viewport width, never above 1. Returns
    /// the new scale.
    pub fn fit_to_width(&mut self, viewport_width: f64) -> f64 {
        self.scale = if viewport_width.is_finite() && viewport_width > 0.0 {
            (viewport_width / CANONICAL_WIDTH as f64).min(1.0)
        } else {
            1.0
        };
        self.scale
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Mark a capture as running and pin the scale to 1. Returns the scale to
    /// restore afterwards, or `None` when a capture is already running.
    pub fn pin_for_capture(&mut self) -> Option<f64> {
        if self.busy {
            return None;
        }
        let saved = self.scale;
        self.busy = true;
        self.scale = 1.0;
        Some(saved)
    }

    /// End a capture started with [`PreviewState::pin_for_capture`]
    pub fn release_capture(&mut self, saved_scale: f64) {
        self.scale = saved_scale;
        self.busy = false;
    }

    /// The surface as it currently appears on screen
    pub fn presented(&self, surface: &RenderedSurface) -> RenderedSurface {
        if self.scale == 1.0 {
            surface.clone()
        } else {
            surface.scaled(self.scale)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn sheet() -> RenderedSurface {
        RenderedSurface {
            width: 794.0,
            height: 1123.0,
            background: Color::WHITE,
            items: Vec::new(),
        }
    }

    #[test]
    fn test_fit_to_width() {
        let mut state = PreviewState::new();
        assert_eq!(state.fit_to_width(397.0), 0.5);
        assert_eq!(state.fit_to_width(1920.0), 1.0);
        assert_eq!(state.fit_to_width(0.0), 1.0);
        assert_eq!(state.fit_to_width(f64::NAN), 1.0);
    }

    #[test]
    fn test_presented_uses_scale() {
        let mut state = PreviewState::new();
        assert_eq!(state.presented(&sheet()).width, 794.0);

        state.set_scale(0.5).unwrap();
        let shown = state.presented(&sheet());
        assert_eq!(shown.width, 397.0);
        assert_eq!(shown.height, 561.5);
    }

    #[test]
    fn test_invalid_scale() {
        let mut state = PreviewState::new();
        assert!(state.set_scale(0.0).is_err());
        assert!(state.set_scale(f64::NAN).is_err());
        assert_eq!(state.scale(), 1.0);
    }

    #[test]
    fn test_capture_pins_and_restores_scale() {
        let mut state = PreviewState::new();
        state.set_scale(0.5).unwrap();

        let saved = state.pin_for_capture().unwrap();
        assert_eq!(saved, 0.5);
        assert_eq!(state.scale(), 1.0);
        assert!(state.is_busy());
        assert_eq!(state.presented(&sheet()).width, 794.0);
        assert!(state.pin_for_capture().is_none());

        state.release_capture(saved);
        assert_eq!(state.scale(), 0.5);
        assert!(!state.is_busy());
    }
}
