//! BiDi (Bidirectional text) support
//!
//! Glyphs are painted strictly left to right, so any line containing
//! right-to-left text (the Arabic invocation) is reordered to visual order
//! with the Unicode Bidirectional Algorithm (UAX #9) before it is placed.

use std::ops::Range;

use unicode_bidi::{BidiInfo, Level};
use unicode_segmentation::UnicodeSegmentation;

use crate::Direction;

/// A contiguous run of text with one embedding level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidiRun {
    /// Byte range in the logical text
    pub range: Range<usize>,
    pub direction: Direction,
    /// Embedding level (even = LTR, odd = RTL)
    pub level: u8,
}

impl BidiRun {
    pub fn new(range: Range<usize>, level: u8) -> Self {
        Self {
            range,
            direction: if level % 2 == 0 {
                Direction::Ltr
            } else {
                Direction::Rtl
            },
            level,
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.direction == Direction::Rtl
    }
}

/// A line ready for left-to-right painting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualLine {
    /// Characters in the order they appear on screen
    pub text: String,
    /// Paragraph direction of the source text
    pub direction: Direction,
}

/// BiDi analyzer for determining text direction and visual order
#[derive(Debug, Clone, Copy, Default)]
pub struct BidiAnalyzer;

impl BidiAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Direction of the first strong character, LTR when there is none
    pub fn detect_base_direction(&self, text: &str) -> Direction {
        match unicode_bidi::get_base_direction(text) {
            unicode_bidi::Direction::Rtl => Direction::Rtl,
            _ => Direction::Ltr,
        }
    }

    /// Check if text contains any RTL characters
    pub fn has_rtl(&self, text: &str) -> bool {
        !text.is_empty() && BidiInfo::new(text, None).has_rtl()
    }

    /// Runs of the first paragraph in visual order
    pub fn visual_runs(&self, text: &str) -> Vec<BidiRun> {
        if text.is_empty() {
            return Vec::new();
        }

        let info = BidiInfo::new(text, None);
        let Some(para) = info.paragraphs.first() else {
            return Vec::new();
        };

        let (levels, runs) = info.visual_runs(para, para.range.clone());
        runs.into_iter()
            .map(|range| {
                let level = levels
                    .get(range.start)
                    .copied()
                    .unwrap_or_else(Level::ltr)
                    .number();
                BidiRun::new(range, level)
            })
            .collect()
    }

    /// Reorder a single line into visual order.
    ///
    /// Pure LTR text comes back unchanged.
    pub fn visual_line(&self, text: &str) -> VisualLine {
        let direction = self.detect_base_direction(text);
        if !self.has_rtl(text) {
            return VisualLine {
                text: text.to_string(),
                direction,
            };
        }

        let info = BidiInfo::new(text, None);
        let Some(para) = info.paragraphs.first() else {
            return VisualLine {
                text: text.to_string(),
                direction,
            };
        };

        // Reverse by grapheme so combining marks stay after their base
        let (levels, runs) = info.visual_runs(para, para.range.clone());
        let mut reordered = String::with_capacity(text.len());
        for range in runs {
            let run = &text[range.clone()];
            if levels.get(range.start).is_some_and(|l| l.is_rtl()) {
                reordered.extend(run.graphemes(true).rev());
            } else {
                reordered.push_str(run);
            }
        }

        VisualLine {
            text: reordered,
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ltr_unchanged() {
        let analyzer = BidiAnalyzer::new();
        let line = analyzer.visual_line("Assalamualaikum Wr. Wb.");
        assert_eq!(line.text, "Assalamualaikum Wr. Wb.");
        assert_eq!(line.direction, Direction::Ltr);
        assert!(!analyzer.has_rtl("Assalamualaikum"));
    }

    #[test]
    fn test_arabic_reversed() {
        let analyzer = BidiAnalyzer::new();
        let logical = "\u{0627}\u{0628} \u{062A}";
        let line = analyzer.visual_line(logical);
        assert_eq!(line.direction, Direction::Rtl);
        assert_eq!(line.text, "\u{062A} \u{0628}\u{0627}");
    }

    #[test]
    fn test_marks_follow_their_base() {
        let analyzer = BidiAnalyzer::new();
        let line = analyzer.visual_line("\u{0627}\u{064E}\u{0628}");
        assert_eq!(line.text, "\u{0628}\u{0627}\u{064E}");
    }

    #[test]
    fn test_mixed_runs() {
        let analyzer = BidiAnalyzer::new();
        let runs = analyzer.visual_runs("abc \u{05D0}\u{05D1}\u{05D2}");
        assert!(runs.len() >= 2);
        assert!(runs.iter().any(|r| r.is_rtl()));
        assert!(analyzer.visual_runs("").is_empty());
    }
}
