//! Convert a surface layout to a rendered surface

use layout_engine::SurfaceLayout;
use tracing::debug;

use crate::{Color, ControlInfo, GlyphRun, Rect, RenderError, RenderItem, RenderedSurface, Result, DOWNLOAD_CONTROL_ID};

/// Label of the download control
pub const DOWNLOAD_LABEL: &str = "Download PDF (Siap Cetak)";

const CONTROL_WIDTH: f64 = 240.0;
const CONTROL_HEIGHT: f64 = 44.0;

/// Configuration for render conversion
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Background color of the sheet
    pub background: Color,
    /// Hairline drawn around the sheet, if any
    pub border: Option<Color>,
    pub font_family: String,
    /// Add the on-screen download control
    pub include_controls: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            border: Some(Color::SHEET_BORDER),
            font_family: "serif".to_string(),
            include_controls: true,
        }
    }
}

/// Converts a [`SurfaceLayout`] to a [`RenderedSurface`]
#[derive(Debug, Clone, Default)]
pub struct RenderConverter {
    config: RenderConfig,
}

impl RenderConverter {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn convert(&self, layout: &SurfaceLayout) -> Result<RenderedSurface> {
        let width = layout.width as f64;
        let height = layout.height as f64;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RenderError::InvalidLayout(format!(
                "surface must have a positive size, got {}x{}",
                width, height
            )));
        }

        let mut items = Vec::new();

        if let Some(border) = self.config.border {
            items.push(RenderItem::Rectangle {
                bounds: Rect::new(0.0, 0.0, width, height),
                fill: None,
                stroke: Some(border),
                stroke_width: 1.0,
            });
        }

        for line in &layout.lines {
            for span in &line.spans {
                if span.text.is_empty() {
                    continue;
                }
                items.push(RenderItem::GlyphRun(GlyphRun {
                    text: span.text.clone(),
                    font_family: self.config.font_family.clone(),
                    font_size: span.style.font_size as f64,
                    weight: span.style.weight.numeric(),
                    bold: span.style.weight.is_bold(),
                    italic: span.style.italic,
                    letter_spacing: span.style.letter_spacing as f64,
                    color: span.style.color.into(),
                    x: span.x as f64,
                    y: line.baseline as f64,
                    width: span.width as f64,
                }));
            }
        }

        if self.config.include_controls {
            // centered in the bottom padding, below the sign-off
            let top = (layout.content_bottom as f64 + height - CONTROL_HEIGHT) / 2.0;
            items.push(RenderItem::Control(ControlInfo {
                id: DOWNLOAD_CONTROL_ID.to_string(),
                label: DOWNLOAD_LABEL.to_string(),
                bounds: Rect::new(
                    (width - CONTROL_WIDTH) / 2.0,
                    top.min(height - CONTROL_HEIGHT).max(0.0),
                    CONTROL_WIDTH,
                    CONTROL_HEIGHT,
                ),
            }));
        }

        debug!(items = items.len(), width, height, "Converted layout to render items");

        Ok(RenderedSurface {
            width,
            height,
            background: self.config.background,
            items,
        })
    }
}
