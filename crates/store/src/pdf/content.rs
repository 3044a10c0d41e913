//! PDF content streams
//!
//! Export pages only ever paint one image, so the builder covers the
//! graphics state and XObject operators:
//!
//! - `q` / `Q`: save / restore graphics state
//! - `cm`: concatenate transformation matrix
//! - `Do`: paint an XObject

use std::fmt::Write as _;

use super::objects::format_real;

#[derive(Debug, Default)]
pub struct ContentStream {
    data: String,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data.into_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.data.push_str("q\n");
        self
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.data.push_str("Q\n");
        self
    }

    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        let _ = writeln!(
            self.data,
            "{} {} {} {} {} {} cm",
            format_real(a),
            format_real(b),
            format_real(c),
            format_real(d),
            format_real(e),
            format_real(f)
        );
        self
    }

    pub fn draw_xobject(&mut self, name: &str) -> &mut Self {
        let _ = writeln!(self.data, "/{} Do", name);
        self
    }

    /// Paint image `name` across `width` points, `height` points tall, with
    /// its top edge at the top of a page `page_height` points tall
    pub fn place_image_at_top(&mut self, name: &str, width: f64, height: f64, page_height: f64) -> &mut Self {
        self.save_state()
            .transform(width, 0.0, 0.0, height, 0.0, page_height - height)
            .draw_xobject(name)
            .restore_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_image_at_top() {
        let mut content = ContentStream::new();
        content.place_image_at_top("Im0", 595.2756, 841.8898, 841.8898);
        assert_eq!(content.as_str(), "q\n595.2756 0 0 841.8898 0 0 cm\n/Im0 Do\nQ\n");
    }

    #[test]
    fn test_short_band_hangs_from_top() {
        let mut content = ContentStream::new();
        content.place_image_at_top("Im1", 500.0, 200.0, 800.0);
        assert!(content.as_str().contains("500 0 0 200 0 600 cm"));
    }
}
