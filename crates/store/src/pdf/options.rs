//! PDF export options

use raster::PageSpec;
use serde::{Deserialize, Serialize};

/// How page bitmaps are embedded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    /// Baseline JPEG (`DCTDecode`)
    #[default]
    Jpeg,
    /// Lossless zlib-compressed RGB (`FlateDecode`)
    Flate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfExportOptions {
    /// Document title; derived from the deceased's name when absent
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub image_encoding: ImageEncoding,
    /// JPEG quality, 1-100
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default)]
    pub page: PageSpec,
    /// Flate-compress page content streams
    #[serde(default = "default_compress")]
    pub compress: bool,
}

fn default_jpeg_quality() -> u8 {
    100
}

fn default_compress() -> bool {
    true
}

impl Default for PdfExportOptions {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            image_encoding: ImageEncoding::default(),
            jpeg_quality: default_jpeg_quality(),
            page: PageSpec::a4(),
            compress: default_compress(),
        }
    }
}

impl PdfExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_image_encoding(mut self, encoding: ImageEncoding) -> Self {
        self.image_encoding = encoding;
        self
    }

    /// Quality is clamped to 1-100
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn with_page(mut self, page: PageSpec) -> Self {
        self.page = page;
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub(crate) fn effective_jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }
}
