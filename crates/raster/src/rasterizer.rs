//! Surface capture

use std::sync::Arc;

use render_model::{RenderItem, RenderedSurface};
use tracing::{debug, warn};

use crate::error::{CaptureError, Result};
use crate::{Bitmap, GlyphPainter};

/// Canonical supersampling factor
pub const DEFAULT_SUPERSAMPLING: u32 = 3;

/// Largest bitmap a capture may allocate, in pixels
pub const DEFAULT_PIXEL_BUDGET: u64 = 200_000_000;

/// Rasterizes a [`RenderedSurface`] into an opaque bitmap at a fixed
/// supersampling factor
#[derive(Clone)]
pub struct Rasterizer {
    factor: u32,
    pixel_budget: u64,
    painter: Arc<dyn GlyphPainter>,
}

impl Rasterizer {
    pub fn new(painter: Arc<dyn GlyphPainter>) -> Self {
        Self {
            factor: DEFAULT_SUPERSAMPLING,
            pixel_budget: DEFAULT_PIXEL_BUDGET,
            painter,
        }
    }

    pub fn with_factor(mut self, factor: u32) -> Result<Self> {
        if factor == 0 {
            return Err(CaptureError::InvalidFactor(factor));
        }
        self.factor = factor;
        Ok(self)
    }

    pub fn with_pixel_budget(mut self, pixel_budget: u64) -> Self {
        self.pixel_budget = pixel_budget;
        self
    }

    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Bitmap dimensions a capture of `surface` would produce
    pub fn output_size(&self, surface: &RenderedSurface) -> Result<(u32, u32)> {
        if !(surface.width.is_finite() && surface.height.is_finite())
            || surface.width <= 0.0
            || surface.height <= 0.0
        {
            return Err(CaptureError::SurfaceUnavailable(format!(
                "surface has no area ({}x{})",
                surface.width, surface.height
            )));
        }

        let factor = self.factor as f64;
        let width = (surface.width * factor).round() as u64;
        let height = (surface.height * factor).round() as u64;
        if width == 0 || height == 0 {
            return Err(CaptureError::SurfaceUnavailable(format!(
                "surface rounds to an empty bitmap ({}x{})",
                width, height
            )));
        }
        if width.saturating_mul(height) > self.pixel_budget
            || width > u32::MAX as u64
            || height > u32::MAX as u64
        {
            return Err(CaptureError::TooLarge {
                width,
                height,
                budget: self.pixel_budget,
            });
        }
        Ok((width as u32, height as u32))
    }

    /// Capture the surface.
    ///
    /// The background is always opaque white and interactive controls are
    /// left out.
    pub fn capture(&self, surface: &RenderedSurface) -> Result<Bitmap> {
        let (width, height) = self.output_size(surface)?;
        let mut bitmap = Bitmap::white(width, height);
        let factor = self.factor as f64;

        if surface.background.is_opaque() && surface.background != render_model::Color::WHITE {
            warn!(background = ?surface.background, "Ignoring non-white background for capture");
        }

        for item in surface.items.iter().filter(|item| !item.is_interactive()) {
            match item.scaled(factor) {
                RenderItem::GlyphRun(run) => self.painter.paint_run(&mut bitmap, &run),
                RenderItem::Rectangle {
                    bounds,
                    fill,
                    stroke,
                    stroke_width,
                } => {
                    let (x0, y0) = (bounds.x.round() as i64, bounds.y.round() as i64);
                    let (x1, y1) = (bounds.right().round() as i64, bounds.bottom().round() as i64);
                    if let Some(fill) = fill.filter(|c| c.a > 0) {
                        bitmap.fill_rect(x0, y0, x1, y1, [fill.r, fill.g, fill.b]);
                    }
                    if let Some(stroke) = stroke.filter(|c| c.a > 0) {
                        let thickness = stroke_width.round().max(1.0) as i64;
                        bitmap.stroke_rect(x0, y0, x1, y1, thickness, [stroke.r, stroke.g, stroke.b]);
                    }
                }
                RenderItem::Control(_) => {}
            }
        }

        debug!(
            width,
            height,
            factor = self.factor,
            painter = self.painter.name(),
            "Captured surface"
        );
        Ok(bitmap)
    }
}
