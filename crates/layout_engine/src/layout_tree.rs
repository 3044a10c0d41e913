//! Layout tree structure

use serde::{Deserialize, Serialize};

use crate::MournerLayout;

/// Body text size in CSS px
pub const BODY_FONT_SIZE: f32 = 13.5;

/// Line height as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.4;

/// A rectangle in layout coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Text direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Horizontal alignment of a line inside its container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Center,
    Left,
}

/// Opaque text color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TextColor {
    pub const BLACK: TextColor = TextColor::rgb(0x00, 0x00, 0x00);
    /// Section headings
    pub const DARK: TextColor = TextColor::rgb(0x33, 0x33, 0x33);
    /// Subtitles, transliteration and relationship notes
    pub const MUTED: TextColor = TextColor::rgb(0x55, 0x55, 0x55);
    /// The empty-list placeholder
    pub const FAINT: TextColor = TextColor::rgb(0x66, 0x66, 0x66);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for TextColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// CSS-style font weight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Normal,
    SemiBold,
    Bold,
    ExtraBold,
}

impl FontWeight {
    pub fn numeric(&self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::SemiBold => 600,
            FontWeight::Bold => 700,
            FontWeight::ExtraBold => 800,
        }
    }

    /// Whether a bold face should be used
    pub fn is_bold(&self) -> bool {
        *self >= FontWeight::SemiBold
    }
}

/// Visual style of a run of text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f32,
    pub weight: FontWeight,
    pub italic: bool,
    /// Extra advance added after every character, in CSS px
    pub letter_spacing: f32,
    pub color: TextColor,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::sized(BODY_FONT_SIZE)
    }
}

impl TextStyle {
    pub fn sized(font_size: f32) -> Self {
        Self {
            font_size,
            weight: FontWeight::Normal,
            italic: false,
            letter_spacing: 0.0,
            color: TextColor::BLACK,
        }
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn spaced(mut self, letter_spacing: f32) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    pub fn color(mut self, color: TextColor) -> Self {
        self.color = color;
        self
    }

    pub fn line_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT_FACTOR
    }
}

/// A styled piece of text before positioning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub style: TextStyle,
    /// Horizontal gap before the span
    #[serde(default)]
    pub margin_left: f32,
}

impl Span {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            margin_left: 0.0,
        }
    }

    pub fn with_margin_left(mut self, margin_left: f32) -> Self {
        self.margin_left = margin_left;
        self
    }
}

/// A span placed on a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedSpan {
    pub text: String,
    pub style: TextStyle,
    /// Left edge of the first glyph in surface coordinates
    pub x: f32,
    pub width: f32,
}

/// What a line is for. Used by the preview dump and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineRole {
    Title,
    Subtitle,
    Salutation,
    Invocation,
    Transliteration,
    LeadIn,
    DeceasedName,
    Age,
    Residence,
    SectionHeading,
    Detail,
    Closing,
    MournerHeading,
    Mourner,
    MournerPlaceholder,
    SignOff,
}

/// One positioned line of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBox {
    pub role: LineRole,
    pub bounds: Rect,
    /// Baseline in surface coordinates
    pub baseline: f32,
    pub align: TextAlign,
    pub direction: Direction,
    pub spans: Vec<PositionedSpan>,
}

impl LineBox {
    /// Concatenated text of all spans, in display order
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// The laid-out announcement on its canonical surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceLayout {
    pub width: f32,
    pub height: f32,
    pub lines: Vec<LineBox>,
    pub mourner_layout: MournerLayout,
    /// Bottom edge of the last line
    pub content_bottom: f32,
}

impl SurfaceLayout {
    pub fn lines_with_role(&self, role: LineRole) -> impl Iterator<Item = &LineBox> + '_ {
        self.lines.iter().filter(move |l| l.role == role)
    }

    /// Plain-text rendering of the layout, one entry per line
    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(LineBox::text).collect()
    }

    /// Whether the content needed more than one canonical page height
    pub fn overflows(&self, page_height: f32) -> bool {
        self.height > page_height
    }
}
