//! Line breaking
//!
//! Greedy breaking of styled spans at Unicode line break opportunities
//! (UAX #14). A word may straddle several spans, e.g. a bold name directly
//! followed by a comma. Words wider than the available width are broken
//! between grapheme clusters.

use std::ops::Range;

use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

use crate::{Span, TextMeasure};

const WIDTH_EPSILON: f32 = 0.01;

/// Part of one span inside a word
#[derive(Debug, Clone, PartialEq)]
struct Fragment {
    span: usize,
    /// Byte range into the span's text
    range: Range<usize>,
}

#[derive(Debug, Clone)]
struct Word {
    fragments: Vec<Fragment>,
    /// Width including trailing whitespace
    width: f32,
    /// Width without trailing whitespace
    ink_width: f32,
    forces_break: bool,
}

/// One output line
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    pub spans: Vec<Span>,
    /// Width without trailing whitespace
    pub width: f32,
}

/// Breaks styled text into lines no wider than a limit
pub struct LineBreaker<'a, M: TextMeasure + ?Sized> {
    measure: &'a M,
}

impl<'a, M: TextMeasure + ?Sized> LineBreaker<'a, M> {
    pub fn new(measure: &'a M) -> Self {
        Self { measure }
    }

    /// Width of a run of spans laid out on one line
    pub fn spans_width(&self, spans: &[Span]) -> f32 {
        spans
            .iter()
            .map(|s| s.margin_left + self.measure.text_width(&s.text, &s.style))
            .sum()
    }

    /// Break `spans` into lines of at most `max_width`.
    ///
    /// Trailing whitespace never counts against the limit. Returns no lines
    /// when there is no text at all.
    pub fn break_spans(&self, spans: &[Span], max_width: f32) -> Vec<BrokenLine> {
        let words = self.collect_words(spans, max_width);

        let mut lines = Vec::new();
        let mut current: Vec<Fragment> = Vec::new();
        let mut current_width = 0.0;

        for word in words {
            if !current.is_empty() && current_width + word.ink_width > max_width + WIDTH_EPSILON {
                lines.push(self.finish_line(spans, std::mem::take(&mut current)));
                current_width = 0.0;
            }

            current.extend(word.fragments);
            current_width += word.width;

            if word.forces_break {
                lines.push(self.finish_line(spans, std::mem::take(&mut current)));
                current_width = 0.0;
            }
        }

        if !current.is_empty() {
            lines.push(self.finish_line(spans, current));
        }

        lines.retain(|line| !line.spans.is_empty());
        lines
    }

    fn collect_words(&self, spans: &[Span], max_width: f32) -> Vec<Word> {
        let mut full = String::new();
        let mut starts = Vec::with_capacity(spans.len());
        for span in spans {
            starts.push(full.len());
            full.push_str(&span.text);
        }
        if full.is_empty() {
            return Vec::new();
        }

        let mut words = Vec::new();
        let mut word_start = 0;
        for (offset, opportunity) in linebreaks(&full) {
            if offset <= word_start {
                continue;
            }
            let fragments = split_by_span(spans, &starts, word_start..offset);
            let forces_break = opportunity == BreakOpportunity::Mandatory && offset < full.len();
            let word = self.measure_word(spans, fragments, forces_break);

            if word.ink_width > max_width + WIDTH_EPSILON {
                words.extend(self.split_graphemes(spans, &word));
            } else {
                words.push(word);
            }
            word_start = offset;
        }

        words
    }

    fn measure_word(&self, spans: &[Span], fragments: Vec<Fragment>, forces_break: bool) -> Word {
        let width = self.fragments_width(spans, &fragments, false);
        let ink_width = self.fragments_width(spans, &fragments, true);
        Word {
            fragments,
            width,
            ink_width,
            forces_break,
        }
    }

    /// Turn an oversized word into one word per grapheme cluster
    fn split_graphemes(&self, spans: &[Span], word: &Word) -> Vec<Word> {
        let mut pieces = Vec::new();
        for fragment in &word.fragments {
            let text = &spans[fragment.span].text[fragment.range.clone()];
            for (offset, grapheme) in text.grapheme_indices(true) {
                let start = fragment.range.start + offset;
                let piece = Fragment {
                    span: fragment.span,
                    range: start..start + grapheme.len(),
                };
                pieces.push(self.measure_word(spans, vec![piece], false));
            }
        }
        if let Some(last) = pieces.last_mut() {
            last.forces_break = word.forces_break;
        }
        pieces
    }

    fn fragments_width(&self, spans: &[Span], fragments: &[Fragment], trim_end: bool) -> f32 {
        let mut width = 0.0;
        let mut trimming = trim_end;
        for fragment in fragments.iter().rev() {
            let span = &spans[fragment.span];
            let mut text = &span.text[fragment.range.clone()];
            if trimming {
                text = text.trim_end();
                if text.is_empty() {
                    continue;
                }
                trimming = false;
            }
            width += self.measure.text_width(text, &span.style);
            if fragment.range.start == 0 {
                width += span.margin_left;
            }
        }
        width
    }

    fn finish_line(&self, spans: &[Span], fragments: Vec<Fragment>) -> BrokenLine {
        let width = self.fragments_width(spans, &fragments, true);

        let mut out: Vec<Span> = Vec::new();
        let mut last_span = None;
        for fragment in &fragments {
            let source = &spans[fragment.span];
            let text = &source.text[fragment.range.clone()];
            match out.last_mut() {
                Some(span) if last_span == Some(fragment.span) => span.text.push_str(text),
                _ => {
                    let margin = if fragment.range.start == 0 {
                        source.margin_left
                    } else {
                        0.0
                    };
                    out.push(Span::new(text, source.style).with_margin_left(margin));
                }
            }
            last_span = Some(fragment.span);
        }

        while let Some(span) = out.last_mut() {
            let trimmed_len = span.text.trim_end().len();
            if trimmed_len == 0 {
                out.pop();
            } else {
                span.text.truncate(trimmed_len);
                break;
            }
        }

        BrokenLine { spans: out, width }
    }
}

fn split_by_span(spans: &[Span], starts: &[usize], word: Range<usize>) -> Vec<Fragment> {
    spans
        .iter()
        .zip(starts)
        .enumerate()
        .filter_map(|(index, (span, &start))| {
            let end = start + span.text.len();
            let from = word.start.max(start);
            let to = word.end.min(end);
            (from < to).then(|| Fragment {
                span: index,
                range: from - start..to - start,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EstimatedMetrics, FontWeight, TextStyle};

    fn plain(text: &str) -> Span {
        Span::new(text, TextStyle::sized(10.0))
    }

    #[test]
    fn test_single_line() {
        let metrics = EstimatedMetrics::new();
        let breaker = LineBreaker::new(&metrics);
        let lines = breaker.break_spans(&[plain("Assalamualaikum Wr. Wb.")], 500.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].text, "Assalamualaikum Wr. Wb.");
    }

    #[test]
    fn test_empty_text() {
        let metrics = EstimatedMetrics::new();
        let breaker = LineBreaker::new(&metrics);
        assert!(breaker.break_spans(&[plain("")], 100.0).is_empty());
        assert!(breaker.break_spans(&[], 100.0).is_empty());
    }

    #[test]
    fn test_wraps_at_spaces() {
        let metrics = EstimatedMetrics::new();
        let breaker = LineBreaker::new(&metrics);
        // each word is 5 graphemes = 25px, a space 2.5px
        let lines = breaker.break_spans(&[plain("aaaaa bbbbb ccccc")], 55.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].text, "aaaaa bbbbb");
        assert_eq!(lines[1].spans[0].text, "ccccc");
        assert!((lines[0].width - 52.5).abs() < 1e-3);
    }

    #[test]
    fn test_word_straddling_spans_stays_together() {
        let metrics = EstimatedMetrics::new();
        let breaker = LineBreaker::new(&metrics);
        let bold = TextStyle::sized(10.0).weight(FontWeight::Bold);
        let spans = vec![plain("aaaa "), Span::new("Krandekan", bold), plain(", bb")];
        let lines = breaker.break_spans(&spans, 60.0);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].spans.len(), 1);
        assert_eq!(lines[0].spans[0].text, "aaaa");
        assert_eq!(lines[1].spans.len(), 2);
        assert_eq!(lines[1].spans[0].text, "Krandekan");
        assert_eq!(lines[1].spans[1].text, ",");
        assert_eq!(lines[2].spans[0].text, "bb");
    }

    #[test]
    fn test_oversized_word_breaks_between_graphemes() {
        let metrics = EstimatedMetrics::new();
        let breaker = LineBreaker::new(&metrics);
        let lines = breaker.break_spans(&[plain("abcdefghij")], 20.0);
        let texts: Vec<_> = lines.iter().map(|l| l.spans[0].text.clone()).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_margin_counts_once() {
        let metrics = EstimatedMetrics::new();
        let breaker = LineBreaker::new(&metrics);
        let spans = vec![plain("aa"), plain(" (bb)").with_margin_left(8.0)];
        let lines = breaker.break_spans(&spans, 500.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[1].margin_left, 8.0);
        assert!((lines[0].width - breaker.spans_width(&spans)).abs() < 1e-3);
    }

    #[test]
    fn test_mandatory_break() {
        let metrics = EstimatedMetrics::new();
        let breaker = LineBreaker::new(&metrics);
        let lines = breaker.break_spans(&[plain("aa\nbb")], 500.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].text, "aa");
        assert_eq!(lines[1].spans[0].text, "bb");
    }
}
