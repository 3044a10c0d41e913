//! PDF writer
//!
//! Object numbering, the cross-reference table and the file trailer, plus
//! the document writer that turns page images into a complete file.

use std::io::{self, Write};

use chrono::Utc;
use raster::PageImage;
use thiserror::Error;
use tracing::debug;

use super::content::ContentStream;
use super::document::{create_catalog, create_pages, DocumentInfo, MediaBox, PdfPage, PDF_VERSION, PT_PER_MM};
use super::images::ImageData;
use super::objects::{PdfDictionary, PdfObject, PdfSerializer, PdfStream};
use super::options::PdfExportOptions;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Image encoding error: {0}")]
    Image(String),

    #[error("Compression error: {0}")]
    Compression(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// Low-level writer tracking byte offsets for the xref table
pub struct PdfWriter<W: Write> {
    writer: W,
    position: u64,
    /// (object number, byte offset)
    offsets: Vec<(u32, u64)>,
    next_obj_num: u32,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            position: 0,
            offsets: Vec::new(),
            next_obj_num: 1,
            compress: true,
        }
    }

    /// Flate-compress streams that are not already encoded
    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    pub fn allocate_object(&mut self) -> u32 {
        let num = self.next_obj_num;
        self.next_obj_num += 1;
        num
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.write_str(&format!("%PDF-{}\n", PDF_VERSION))?;
        // Binary marker so transfer tools treat the file as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])
    }

    pub fn write_object(&mut self, obj_num: u32, object: &PdfObject) -> Result<()> {
        self.offsets.push((obj_num, self.position));
        self.write_str(&format!("{} 0 obj\n", obj_num))?;

        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(object)?;
        self.write_bytes(&serializer.into_inner())?;

        self.write_str("\nendobj\n")
    }

    pub fn write_stream_object(&mut self, obj_num: u32, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.encoded {
            stream = compress_stream(stream)?;
        }
        stream.dict.insert("Length", PdfObject::Integer(stream.data.len() as i64));
        self.write_object(obj_num, &PdfObject::Stream(stream))
    }

    pub fn write_xref_and_trailer(&mut self, catalog_ref: u32, info_ref: u32) -> Result<()> {
        let xref_offset = self.position;
        let size = self.next_obj_num;

        let mut offsets = std::mem::take(&mut self.offsets);
        offsets.sort_by_key(|(num, _)| *num);

        self.write_str(&format!("xref\n0 {}\n", size))?;
        self.write_str("0000000000 65535 f \n")?;
        let mut expected = 1u32;
        for (obj_num, offset) in offsets {
            while expected < obj_num {
                self.write_str("0000000000 65535 f \n")?;
                expected += 1;
            }
            self.write_str(&format!("{:010} 00000 n \n", offset))?;
            expected = obj_num + 1;
        }

        let mut trailer = PdfDictionary::new();
        trailer.insert("Size", size);
        trailer.insert("Root", PdfObject::reference(catalog_ref));
        trailer.insert("Info", PdfObject::reference(info_ref));

        self.write_str("trailer\n")?;
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(&PdfObject::Dictionary(trailer))?;
        self.write_bytes(&serializer.into_inner())?;
        self.write_str(&format!("\nstartxref\n{}\n%%EOF\n", xref_offset))
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn compress_stream(mut stream: PdfStream) -> Result<PdfStream> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&stream.data)
        .map_err(|e| PdfError::Compression(e.to_string()))?;
    stream.data = encoder
        .finish()
        .map_err(|e| PdfError::Compression(e.to_string()))?;
    stream.encoded = true;
    stream.dict.insert("Filter", PdfObject::name("FlateDecode"));
    Ok(stream)
}

/// Writes one page per [`PageImage`], each band drawn full width from the
/// top of the page
pub struct PdfDocumentWriter {
    options: PdfExportOptions,
}

impl PdfDocumentWriter {
    pub fn new(options: PdfExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PdfExportOptions {
        &self.options
    }

    pub fn write<W: Write>(&self, pages: &[PageImage], writer: W) -> Result<W> {
        if pages.is_empty() {
            return Err(PdfError::InvalidDocument("No pages to export".to_string()));
        }

        let media_box = MediaBox::from_page_spec(self.options.page);
        let mut pdf = PdfWriter::new(writer);
        pdf.set_compression(self.options.compress);
        pdf.write_header()?;

        let catalog_ref = pdf.allocate_object();
        let pages_ref = pdf.allocate_object();
        let info_ref = pdf.allocate_object();

        // (page, content, image) per page image, in order
        let refs: Vec<(u32, u32, u32)> = pages
            .iter()
            .map(|_| (pdf.allocate_object(), pdf.allocate_object(), pdf.allocate_object()))
            .collect();
        let page_refs: Vec<u32> = refs.iter().map(|(page, _, _)| *page).collect();

        pdf.write_object(catalog_ref, &create_catalog(pages_ref).into())?;
        pdf.write_object(pages_ref, &create_pages(&page_refs).into())?;

        let mut info = DocumentInfo::new();
        info.title = self.options.title.clone();
        info.author = self.options.author.clone();
        info.subject = self.options.subject.clone();
        info.creation_date = Some(Utc::now());
        pdf.write_object(info_ref, &info.to_dictionary().into())?;

        for (page_image, &(page_ref, content_ref, image_ref)) in pages.iter().zip(&refs) {
            if page_image.bitmap.width() == 0 || page_image.bitmap.height() == 0 {
                return Err(PdfError::InvalidDocument(format!(
                    "Page {} has an empty image",
                    page_image.index
                )));
            }

            let image = ImageData::encode(
                &page_image.bitmap,
                self.options.image_encoding,
                self.options.effective_jpeg_quality(),
            )?;
            debug!(
                page = page_image.index,
                rows = ?page_image.band,
                bytes = image.data.len(),
                "Encoded page image"
            );
            pdf.write_stream_object(image_ref, image.to_xobject())?;

            let name = format!("Im{}", page_image.index);
            let mut content = ContentStream::new();
            content.place_image_at_top(
                &name,
                media_box.width,
                page_image.placed_height_mm * PT_PER_MM,
                media_box.height,
            );
            pdf.write_stream_object(content_ref, PdfStream::new(content.into_bytes()))?;

            let page = PdfPage::new(media_box, content_ref, name, image_ref);
            pdf.write_object(page_ref, &page.to_dictionary(pages_ref).into())?;
        }

        pdf.write_xref_and_trailer(catalog_ref, info_ref)?;
        pdf.finish()
    }

    pub fn write_to_bytes(&self, pages: &[PageImage]) -> Result<Vec<u8>> {
        self.write(pages, Vec::new())
    }
}
