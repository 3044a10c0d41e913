//! PDF document structure
//!
//! Catalog, page tree, page dictionaries and the Info dictionary.

use chrono::{DateTime, Utc};
use raster::PageSpec;

use super::objects::{PdfDictionary, PdfObject};

/// Points per millimetre (72 pt per inch)
pub const PT_PER_MM: f64 = 72.0 / 25.4;

pub const PDF_VERSION: &str = "1.4";

/// Info dictionary contents
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: String,
    pub producer: String,
    pub creation_date: Option<DateTime<Utc>>,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentInfo {
    pub fn new() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            creator: "Pawartos Lelayu".to_string(),
            producer: format!("Pawartos Lelayu {}", env!("CARGO_PKG_VERSION")),
            creation_date: None,
        }
    }

    pub fn to_dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        if let Some(title) = &self.title {
            dict.insert("Title", PdfObject::text(title));
        }
        if let Some(author) = &self.author {
            dict.insert("Author", PdfObject::text(author));
        }
        if let Some(subject) = &self.subject {
            dict.insert("Subject", PdfObject::text(subject));
        }
        dict.insert("Creator", PdfObject::text(&self.creator));
        dict.insert("Producer", PdfObject::text(&self.producer));
        if let Some(date) = self.creation_date {
            dict.insert("CreationDate", PdfObject::text(&pdf_date(date)));
        }
        dict
    }
}

/// `D:YYYYMMDDHHmmSS+00'00'`
pub fn pdf_date(date: DateTime<Utc>) -> String {
    format!("D:{}+00'00'", date.format("%Y%m%d%H%M%S"))
}

/// Page dimensions in points, origin at the lower left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub width: f64,
    pub height: f64,
}

impl MediaBox {
    pub fn from_page_spec(spec: PageSpec) -> Self {
        Self {
            width: spec.width_mm * PT_PER_MM,
            height: spec.height_mm * PT_PER_MM,
        }
    }

    /// A4 portrait, about 595 x 842 pt
    pub fn a4() -> Self {
        Self::from_page_spec(PageSpec::a4())
    }

    pub fn to_array(&self) -> PdfObject {
        PdfObject::Array(vec![
            PdfObject::Integer(0),
            PdfObject::Integer(0),
            PdfObject::Real(self.width),
            PdfObject::Real(self.height),
        ])
    }
}

impl Default for MediaBox {
    fn default() -> Self {
        Self::a4()
    }
}

/// One page showing a single image XObject
#[derive(Debug, Clone)]
pub struct PdfPage {
    pub media_box: MediaBox,
    pub content_ref: u32,
    /// Resource name and object number of the page image
    pub image: (String, u32),
}

impl PdfPage {
    pub fn new(media_box: MediaBox, content_ref: u32, image_name: impl Into<String>, image_ref: u32) -> Self {
        Self {
            media_box,
            content_ref,
            image: (image_name.into(), image_ref),
        }
    }

    pub fn build_resources(&self) -> PdfDictionary {
        let mut xobjects = PdfDictionary::new();
        xobjects.insert(self.image.0.clone(), PdfObject::reference(self.image.1));

        let mut resources = PdfDictionary::new();
        resources.insert("XObject", xobjects);
        resources.insert(
            "ProcSet",
            vec![PdfObject::name("PDF"), PdfObject::name("ImageC")],
        );
        resources
    }

    pub fn to_dictionary(&self, parent_ref: u32) -> PdfDictionary {
        let mut dict = PdfDictionary::new().with_type("Page");
        dict.insert("Parent", PdfObject::reference(parent_ref));
        dict.insert("MediaBox", self.media_box.to_array());
        dict.insert("Resources", self.build_resources());
        dict.insert("Contents", PdfObject::reference(self.content_ref));
        dict
    }
}

pub fn create_catalog(pages_ref: u32) -> PdfDictionary {
    let mut dict = PdfDictionary::new().with_type("Catalog");
    dict.insert("Pages", PdfObject::reference(pages_ref));
    dict
}

/// Page tree root, kids in page order
pub fn create_pages(page_refs: &[u32]) -> PdfDictionary {
    let mut dict = PdfDictionary::new().with_type("Pages");
    let kids: Vec<PdfObject> = page_refs.iter().map(|&r| PdfObject::reference(r)).collect();
    dict.insert("Count", PdfObject::Integer(kids.len() as i64));
    dict.insert("Kids", kids);
    dict
}
