//! Document Model - Announcement record, validation, and normalization
//!
//! This crate turns the raw record submitted by the form into an immutable
//! `DocumentModel` that the layout engine can render.

mod date;
mod document;
mod error;
mod record;

pub use date::*;
pub use document::*;
pub use error::*;
pub use record::*;
