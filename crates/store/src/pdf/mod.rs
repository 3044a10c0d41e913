//! PDF export
//!
//! Writes page images as a multi-page PDF. Each page shows one band of the
//! supersampled capture drawn full width from the top edge.
//!
//! - `objects`: PDF object model and serializer
//! - `document`: catalog, page tree, page and Info dictionaries
//! - `content`: page content streams
//! - `images`: JPEG / Flate image XObjects
//! - `options`: export configuration
//! - `writer`: file structure and the document writer
//! - `api`: `export` and the `OutputFile` artifact

mod api;
mod content;
mod document;
mod images;
mod objects;
mod options;
mod writer;

pub use api::*;
pub use document::{MediaBox, PT_PER_MM};
pub use options::*;
pub use writer::{PdfDocumentWriter, PdfError};

#[cfg(test)]
mod tests;
