//! Store - Persistence, settings, and PDF export
//!
//! This crate stores submitted announcements, loads and saves export
//! settings, and writes page images out as a multi-page PDF.

mod error;
mod records;
mod settings;
pub mod pdf;

pub use error::*;
pub use records::*;
pub use settings::*;

pub use pdf::{export, export_file_name, OutputFile, PdfError, PdfExportOptions};
