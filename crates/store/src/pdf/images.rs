//! Page image XObjects
//!
//! Each page band is embedded as one RGB image, either JPEG-encoded
//! (`DCTDecode`) or zlib-compressed raw samples (`FlateDecode`).

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use raster::Bitmap;

use super::objects::{PdfDictionary, PdfObject, PdfStream};
use super::options::ImageEncoding;
use super::writer::{PdfError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    DCTDecode,
    FlateDecode,
}

impl ImageFilter {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ImageFilter::DCTDecode => "DCTDecode",
            ImageFilter::FlateDecode => "FlateDecode",
        }
    }
}

/// An encoded RGB image ready to become an XObject
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub filter: ImageFilter,
    pub data: Vec<u8>,
}

impl ImageData {
    pub fn encode(bitmap: &Bitmap, encoding: ImageEncoding, jpeg_quality: u8) -> Result<Self> {
        match encoding {
            ImageEncoding::Jpeg => Self::encode_jpeg(bitmap, jpeg_quality),
            ImageEncoding::Flate => Self::encode_flate(bitmap),
        }
    }

    pub fn encode_jpeg(bitmap: &Bitmap, quality: u8) -> Result<Self> {
        let mut data = Vec::new();
        JpegEncoder::new_with_quality(&mut data, quality.clamp(1, 100))
            .encode(bitmap.as_raw(), bitmap.width(), bitmap.height(), ExtendedColorType::Rgb8)
            .map_err(|e| PdfError::Image(e.to_string()))?;
        Ok(Self {
            width: bitmap.width(),
            height: bitmap.height(),
            filter: ImageFilter::DCTDecode,
            data,
        })
    }

    pub fn encode_flate(bitmap: &Bitmap) -> Result<Self> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(bitmap.as_raw())
            .map_err(|e| PdfError::Compression(e.to_string()))?;
        let data = encoder
            .finish()
            .map_err(|e| PdfError::Compression(e.to_string()))?;
        Ok(Self {
            width: bitmap.width(),
            height: bitmap.height(),
            filter: ImageFilter::FlateDecode,
            data,
        })
    }

    pub fn to_xobject(&self) -> PdfStream {
        let mut dict = PdfDictionary::new().with_type("XObject");
        dict.insert("Subtype", PdfObject::name("Image"));
        dict.insert("Width", self.width);
        dict.insert("Height", self.height);
        dict.insert("BitsPerComponent", PdfObject::Integer(8));
        dict.insert("ColorSpace", PdfObject::name("DeviceRGB"));
        PdfStream::encoded(dict, self.data.clone(), self.filter.pdf_name())
    }
}
