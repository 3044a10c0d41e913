//! Export - The download cycle
//!
//! Validates a record, lays it out on the canonical surface, captures it at
//! the supersampling factor with the preview scale pinned to 1, cuts the
//! capture into A4 pages and writes the PDF.

mod error;
mod session;

pub use error::*;
pub use session::*;
