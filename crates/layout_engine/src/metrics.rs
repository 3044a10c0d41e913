//! Text measurement
//!
//! Layout never touches font files directly. It asks a [`TextMeasure`] for
//! advance widths, so the same engine runs against estimated metrics in tests
//! and against real font faces when rasterizing.

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::TextStyle;

/// Ascent as a fraction of the font size when no real face is known
pub const DEFAULT_ASCENT_RATIO: f32 = 0.8;

/// Measures text in CSS px
pub trait TextMeasure: Send + Sync {
    /// Advance width of `text`, letter spacing included
    fn text_width(&self, text: &str, style: &TextStyle) -> f32;

    /// Distance from the top of the em box to the baseline
    fn ascent(&self, font_size: f32) -> f32 {
        font_size * DEFAULT_ASCENT_RATIO
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for Arc<T> {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        (**self).text_width(text, style)
    }

    fn ascent(&self, font_size: f32) -> f32 {
        (**self).ascent(font_size)
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        (**self).text_width(text, style)
    }

    fn ascent(&self, font_size: f32) -> f32 {
        (**self).ascent(font_size)
    }
}

/// Deterministic width estimate from grapheme counts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedMetrics {
    /// Average advance of a visible grapheme, in em
    pub average_advance: f32,
    /// Advance of a whitespace grapheme, in em
    pub space_advance: f32,
    /// Width multiplier applied to bold text
    pub bold_factor: f32,
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        Self {
            average_advance: 0.5,
            space_advance: 0.25,
            bold_factor: 1.08,
        }
    }
}

impl EstimatedMetrics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextMeasure for EstimatedMetrics {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        let mut ems = 0.0;
        let mut count = 0usize;
        for grapheme in text.graphemes(true) {
            count += 1;
            ems += if grapheme.chars().all(char::is_whitespace) {
                self.space_advance
            } else {
                self.average_advance
            };
        }

        let factor = if style.weight.is_bold() {
            self.bold_factor
        } else {
            1.0
        };
        ems * style.font_size * factor + count as f32 * style.letter_spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FontWeight;

    #[test]
    fn test_estimated_width() {
        let metrics = EstimatedMetrics::new();
        let style = TextStyle::sized(10.0);
        assert!((metrics.text_width("ab", &style) - 10.0).abs() < 1e-4);
        assert!((metrics.text_width("a b", &style) - 12.5).abs() < 1e-4);
        assert_eq!(metrics.text_width("", &style), 0.0);
    }

    #[test]
    fn test_letter_spacing_and_bold() {
        let metrics = EstimatedMetrics::new();
        let plain = metrics.text_width("abc", &TextStyle::sized(10.0));
        let spaced = metrics.text_width("abc", &TextStyle::sized(10.0).spaced(2.0));
        let bold = metrics.text_width("abc", &TextStyle::sized(10.0).weight(FontWeight::Bold));
        assert!((spaced - plain - 6.0).abs() < 1e-4);
        assert!(bold > plain);
    }

    #[test]
    fn test_combining_marks_count_once() {
        let metrics = EstimatedMetrics::new();
        let style = TextStyle::sized(10.0);
        // alef with fatha is one grapheme
        assert!((metrics.text_width("\u{0627}\u{064E}", &style) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_shared_measure() {
        let metrics: Arc<dyn TextMeasure> = Arc::new(EstimatedMetrics::new());
        let style = TextStyle::sized(10.0);
        assert!((metrics.text_width("ab", &style) - 10.0).abs() < 1e-4);
        assert!((metrics.ascent(10.0) - 8.0).abs() < 1e-4);
    }
}
