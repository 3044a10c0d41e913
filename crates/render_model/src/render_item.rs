//! Render item types

use serde::{Deserialize, Serialize};

/// Identifier of the export trigger shown under the preview
pub const DOWNLOAD_CONTROL_ID: &str = "download-btn";

/// A rectangle in render coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

impl From<layout_engine::Rect> for Rect {
    fn from(r: layout_engine::Rect) -> Self {
        Self {
            x: r.x as f64,
            y: r.y as f64,
            width: r.width as f64,
            height: r.height as f64,
        }
    }
}

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Hairline around the announcement sheet
    pub const SHEET_BORDER: Color = Color::rgb(0xdd, 0xdd, 0xdd);

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<layout_engine::TextColor> for Color {
    fn from(c: layout_engine::TextColor) -> Self {
        Self::rgb(c.r, c.g, c.b)
    }
}

/// A glyph run for rendering text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRun {
    /// Characters in visual (left to right) order
    pub text: String,
    pub font_family: String,
    /// Font size in CSS px
    pub font_size: f64,
    /// Numeric CSS weight (400, 600, 700, 800)
    pub weight: u16,
    pub bold: bool,
    pub italic: bool,
    /// Extra advance after each character
    pub letter_spacing: f64,
    pub color: Color,
    /// Position (baseline start)
    pub x: f64,
    pub y: f64,
    /// Advance width the layout reserved for the run
    pub width: f64,
}

impl GlyphRun {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            font_size: self.font_size * factor,
            letter_spacing: self.letter_spacing * factor,
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            ..self.clone()
        }
    }
}

/// An interactive element that is shown on screen but never exported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlInfo {
    pub id: String,
    pub label: String,
    pub bounds: Rect,
}

/// Render item types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RenderItem {
    /// A glyph run (text)
    GlyphRun(GlyphRun),
    /// A filled and/or stroked rectangle
    Rectangle {
        bounds: Rect,
        fill: Option<Color>,
        stroke: Option<Color>,
        stroke_width: f64,
    },
    /// An on-screen control such as the download button
    Control(ControlInfo),
}

impl RenderItem {
    /// Interactive items are excluded from captures
    pub fn is_interactive(&self) -> bool {
        matches!(self, RenderItem::Control(_))
    }

    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            RenderItem::GlyphRun(run) => RenderItem::GlyphRun(run.scaled(factor)),
            RenderItem::Rectangle {
                bounds,
                fill,
                stroke,
                stroke_width,
            } => RenderItem::Rectangle {
                bounds: bounds.scaled(factor),
                fill: *fill,
                stroke: *stroke,
                stroke_width: stroke_width * factor,
            },
            RenderItem::Control(control) => RenderItem::Control(ControlInfo {
                bounds: control.bounds.scaled(factor),
                ..control.clone()
            }),
        }
    }
}

/// The laid-out announcement ready to be drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedSurface {
    pub width: f64,
    pub height: f64,
    pub background: Color,
    pub items: Vec<RenderItem>,
}

impl RenderedSurface {
    /// The surface with every coordinate multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
            background: self.background,
            items: self.items.iter().map(|item| item.scaled(factor)).collect(),
        }
    }

    pub fn glyph_runs(&self) -> impl Iterator<Item = &GlyphRun> + '_ {
        self.items.iter().filter_map(|item| match item {
            RenderItem::GlyphRun(run) => Some(run),
            _ => None,
        })
    }

    pub fn controls(&self) -> impl Iterator<Item = &ControlInfo> + '_ {
        self.items.iter().filter_map(|item| match item {
            RenderItem::Control(control) => Some(control),
            _ => None,
        })
    }

    /// Copy without interactive items
    pub fn without_controls(&self) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| !item.is_interactive())
                .cloned()
                .collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> RenderedSurface {
        RenderedSurface {
            width: 100.0,
            height: 200.0,
            background: Color::WHITE,
            items: vec![
                RenderItem::GlyphRun(GlyphRun {
                    text: "Lelayu".to_string(),
                    font_family: "serif".to_string(),
                    font_size: 10.0,
                    weight: 400,
                    bold: false,
                    italic: false,
                    letter_spacing: 1.0,
                    color: Color::BLACK,
                    x: 5.0,
                    y: 20.0,
                    width: 30.0,
                }),
                RenderItem::Control(ControlInfo {
                    id: DOWNLOAD_CONTROL_ID.to_string(),
                    label: "Download".to_string(),
                    bounds: Rect::new(10.0, 180.0, 80.0, 10.0),
                }),
            ],
        }
    }

    #[test]
    fn test_scaled_surface() {
        let scaled = surface().scaled(0.5);
        assert_eq!(scaled.width, 50.0);
        assert_eq!(scaled.height, 100.0);
        let run = scaled.glyph_runs().next().unwrap();
        assert_eq!(run.font_size, 5.0);
        assert_eq!(run.letter_spacing, 0.5);
        assert_eq!(run.x, 2.5);
        assert_eq!(scaled.controls().next().unwrap().bounds.y, 90.0);
    }

    #[test]
    fn test_without_controls() {
        let original = surface();
        let stripped = original.without_controls();
        assert_eq!(stripped.items.len(), 1);
        assert_eq!(stripped.controls().count(), 0);
        assert_eq!(original.controls().count(), 1);
    }

    #[test]
    fn test_text_color_conversion() {
        let color = Color::from(layout_engine::TextColor::MUTED);
        assert_eq!(color, Color::rgb(0x55, 0x55, 0x55));
        assert!(color.is_opaque());
        assert!(!Color::TRANSPARENT.is_opaque());
    }
}
