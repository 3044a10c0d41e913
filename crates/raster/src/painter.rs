//! Glyph painting
//!
//! Two painters exist: [`FontPainter`] draws real outlines with rusttype from
//! a font file or a face discovered through font-kit, [`BlockPainter`] draws
//! one solid box per character cell and needs no fonts at all.

use std::path::Path;
use std::sync::Arc;

use font_kit::family_name::FamilyName;
use font_kit::handle::Handle;
use font_kit::properties::{Properties, Style, Weight};
use font_kit::source::SystemSource;
use layout_engine::{EstimatedMetrics, TextMeasure, TextStyle};
use render_model::GlyphRun;
use rusttype::{point, Font, PositionedGlyph, Scale};
use tracing::{debug, warn};

use crate::error::{CaptureError, Result};
use crate::Bitmap;

/// Draws glyph runs into a bitmap.
///
/// Runs arrive already scaled to bitmap pixels.
pub trait GlyphPainter: Send + Sync {
    fn paint_run(&self, bitmap: &mut Bitmap, run: &GlyphRun);

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// The four faces of one family. Missing variants fall back to `regular`.
pub struct FontFaces {
    pub regular: Font<'static>,
    pub bold: Option<Font<'static>>,
    pub italic: Option<Font<'static>>,
    pub bold_italic: Option<Font<'static>>,
}

impl FontFaces {
    pub fn single(face: Font<'static>) -> Self {
        Self {
            regular: face,
            bold: None,
            italic: None,
            bold_italic: None,
        }
    }

    pub fn select(&self, bold: bool, italic: bool) -> &Font<'static> {
        let variant = match (bold, italic) {
            (true, true) => self.bold_italic.as_ref().or(self.bold.as_ref()),
            (true, false) => self.bold.as_ref(),
            (false, true) => self.italic.as_ref(),
            (false, false) => None,
        };
        variant.unwrap_or(&self.regular)
    }
}

/// Paints with real font outlines
pub struct FontPainter {
    faces: FontFaces,
}

impl FontPainter {
    pub fn new(faces: FontFaces) -> Self {
        Self { faces }
    }

    /// Use one font file for every weight and style
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| CaptureError::Font(format!("Failed to read {}: {}", path.display(), e)))?;
        let face = Font::try_from_vec(data)
            .ok_or_else(|| CaptureError::Font(format!("Invalid font data in {}", path.display())))?;
        debug!(path = %path.display(), "Loaded font file");
        Ok(Self::new(FontFaces::single(face)))
    }

    /// Find a family on the system through font-kit
    pub fn discover(family: &str) -> Result<Self> {
        let source = SystemSource::new();
        let regular = load_face(&source, family, Weight::NORMAL, Style::Normal)?;
        let faces = FontFaces {
            regular,
            bold: load_face(&source, family, Weight::BOLD, Style::Normal).ok(),
            italic: load_face(&source, family, Weight::NORMAL, Style::Italic).ok(),
            bold_italic: load_face(&source, family, Weight::BOLD, Style::Italic).ok(),
        };
        debug!(family, "Discovered system font");
        Ok(Self::new(faces))
    }
}

impl GlyphPainter for FontPainter {
    fn paint_run(&self, bitmap: &mut Bitmap, run: &GlyphRun) {
        let color = [run.color.r, run.color.g, run.color.b];
        let face = self.faces.select(run.bold, run.italic);
        let (glyphs, _) = place(
            face,
            &run.text,
            run.font_size as f32,
            run.letter_spacing as f32,
            run.x as f32,
            run.y as f32,
        );

        for glyph in glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    bitmap.blend(
                        gx as i64 + bb.min.x as i64,
                        gy as i64 + bb.min.y as i64,
                        color,
                        coverage,
                    );
                });
            }
        }
    }

    fn name(&self) -> &'static str {
        "font"
    }
}

impl TextMeasure for FontPainter {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        let face = self.faces.select(style.weight.is_bold(), style.italic);
        let (_, width) = place(
            face,
            text,
            style.font_size,
            style.letter_spacing,
            0.0,
            0.0,
        );
        width
    }

    fn ascent(&self, font_size: f32) -> f32 {
        let face = &self.faces.regular;
        face.v_metrics(em_scale(face, font_size)).ascent
    }
}

/// Paints a solid box per character cell.
///
/// Output depends only on the run geometry, which makes it suitable for tests
/// and for hosts without any usable font.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockPainter;

impl BlockPainter {
    pub fn new() -> Self {
        Self
    }
}

impl GlyphPainter for BlockPainter {
    fn paint_run(&self, bitmap: &mut Bitmap, run: &GlyphRun) {
        let graphemes: Vec<&str> = unicode_graphemes(&run.text).collect();
        if graphemes.is_empty() {
            return;
        }

        let color = [run.color.r, run.color.g, run.color.b];
        let cell = run.width / graphemes.len() as f64;
        let top = run.y - run.font_size * 0.7;
        let inset = if run.bold { 0.05 } else { 0.15 };

        for (i, grapheme) in graphemes.iter().enumerate() {
            if grapheme.chars().all(char::is_whitespace) {
                continue;
            }
            let left = run.x + cell * i as f64;
            bitmap.fill_rect(
                (left + cell * inset).round() as i64,
                top.round() as i64,
                (left + cell * (1.0 - inset)).round() as i64,
                run.y.round() as i64,
                color,
            );
        }
    }

    fn name(&self) -> &'static str {
        "block"
    }
}

/// A painter together with the measurer the layout must use with it
#[derive(Clone)]
pub struct TextBackend {
    pub painter: Arc<dyn GlyphPainter>,
    pub measure: Arc<dyn TextMeasure>,
}

impl TextBackend {
    /// Box glyphs with estimated metrics
    pub fn blocks() -> Self {
        Self {
            painter: Arc::new(BlockPainter::new()),
            measure: Arc::new(EstimatedMetrics::new()),
        }
    }

    pub fn font(painter: FontPainter) -> Self {
        let painter = Arc::new(painter);
        Self {
            painter: painter.clone(),
            measure: painter,
        }
    }

    /// Use the font file when given, else the system serif family, else box
    /// glyphs
    pub fn resolve(font_path: Option<&Path>) -> Self {
        if let Some(path) = font_path {
            match FontPainter::from_file(path) {
                Ok(painter) => return Self::font(painter),
                Err(e) => warn!(error = %e, "Configured font unusable, trying system fonts"),
            }
        }

        match FontPainter::discover("serif") {
            Ok(painter) => Self::font(painter),
            Err(e) => {
                warn!(error = %e, "No serif font found, falling back to block glyphs");
                Self::blocks()
            }
        }
    }

    pub fn painter_name(&self) -> &'static str {
        self.painter.name()
    }
}

fn load_face(source: &SystemSource, family: &str, weight: Weight, style: Style) -> Result<Font<'static>> {
    let properties = Properties {
        weight,
        style,
        ..Default::default()
    };
    let family_name = match family.to_lowercase().as_str() {
        "sans-serif" => FamilyName::SansSerif,
        "serif" => FamilyName::Serif,
        "monospace" => FamilyName::Monospace,
        _ => FamilyName::Title(family.to_string()),
    };

    let handle = source
        .select_best_match(&[family_name], &properties)
        .map_err(|_| CaptureError::Font(format!("Font not found: {}", family)))?;

    let (data, index) = match handle {
        Handle::Path { path, font_index } => {
            let data = std::fs::read(&path).map_err(|e| {
                CaptureError::Font(format!("Failed to read {}: {}", path.display(), e))
            })?;
            (data, font_index)
        }
        Handle::Memory { bytes, font_index } => (bytes.as_ref().clone(), font_index),
    };

    Font::try_from_vec_and_index(data, index)
        .ok_or_else(|| CaptureError::Font(format!("Unsupported font data for {}", family)))
}

/// Position every glyph of `text` starting at `x` on `baseline`.
/// Returns the glyphs and the total advance.
fn place(
    face: &Font<'static>,
    text: &str,
    size: f32,
    letter_spacing: f32,
    x: f32,
    baseline: f32,
) -> (Vec<PositionedGlyph<'static>>, f32) {
    let scale = em_scale(face, size);
    let mut caret = x;
    let mut previous = None;
    let mut glyphs = Vec::new();

    for grapheme in unicode_graphemes(text) {
        for ch in grapheme.chars() {
            let glyph = face.glyph(ch);
            if let Some(prev) = previous {
                caret += face.pair_kerning(scale, prev, glyph.id());
            }
            previous = Some(glyph.id());
            let scaled = glyph.scaled(scale);
            let advance = scaled.h_metrics().advance_width;
            glyphs.push(scaled.positioned(point(caret, baseline)));
            caret += advance;
        }
        caret += letter_spacing;
    }

    (glyphs, caret - x)
}

/// rusttype scales by the ascent-to-descent height; CSS sizes are em sizes
fn em_scale(face: &Font<'_>, font_size: f32) -> Scale {
    let v = face.v_metrics_unscaled();
    let units_per_em = face.units_per_em().max(1) as f32;
    Scale::uniform(font_size * (v.ascent - v.descent) / units_per_em)
}

fn unicode_graphemes(text: &str) -> impl Iterator<Item = &str> {
    use unicode_segmentation::UnicodeSegmentation;
    text.graphemes(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use render_model::Color;

    fn run(text: &str, width: f64) -> GlyphRun {
        GlyphRun {
            text: text.to_string(),
            font_family: "serif".to_string(),
            font_size: 30.0,
            weight: 400,
            bold: false,
            italic: false,
            letter_spacing: 0.0,
            color: Color::BLACK,
            x: 10.0,
            y: 40.0,
            width,
        }
    }

    #[test]
    fn test_block_painter_inks_cells() {
        let mut bitmap = Bitmap::white(100, 50);
        BlockPainter::new().paint_run(&mut bitmap, &run("ab", 40.0));
        assert!(bitmap.ink_pixels() > 0);
        // nothing left of the run or below the baseline
        assert_eq!(bitmap.pixel(5, 30), [255, 255, 255]);
        assert_eq!(bitmap.pixel(20, 45), [255, 255, 255]);
        assert_eq!(bitmap.pixel(15, 30), [0, 0, 0]);
    }

    #[test]
    fn test_block_painter_skips_spaces() {
        let mut spaced = Bitmap::white(100, 50);
        BlockPainter::new().paint_run(&mut spaced, &run("a b", 60.0));
        let mut solid = Bitmap::white(100, 50);
        BlockPainter::new().paint_run(&mut solid, &run("abc", 60.0));
        assert!(spaced.ink_pixels() < solid.ink_pixels());
    }

    #[test]
    fn test_block_painter_is_deterministic() {
        let mut a = Bitmap::white(100, 50);
        let mut b = Bitmap::white(100, 50);
        BlockPainter::new().paint_run(&mut a, &run("Lelayu", 80.0));
        BlockPainter::new().paint_run(&mut b, &run("Lelayu", 80.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_font_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = FontPainter::from_file(dir.path().join("missing.ttf"));
        assert!(matches!(result, Err(CaptureError::Font(_))));
    }

    #[test]
    fn test_invalid_font_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(FontPainter::from_file(&path).is_err());
    }

    #[test]
    fn test_blocks_backend() {
        let backend = TextBackend::blocks();
        assert_eq!(backend.painter_name(), "block");
        let width = backend.measure.text_width("ab", &TextStyle::sized(10.0));
        assert!((width - 10.0).abs() < 1e-4);
    }
}
