//! Layout Engine - Announcement layout on a canonical A4 surface
//!
//! This crate turns a validated `DocumentModel` into positioned line boxes:
//! line breaking, BiDi reordering of the Arabic invocation, the mourning-party
//! column/grid decision, and growth of the surface when content overflows.

mod bidi;
mod engine;
mod error;
mod geometry;
mod layout_tree;
mod line_breaker;
mod metrics;
mod mourners;

pub use bidi::*;
pub use engine::*;
pub use error::*;
pub use geometry::*;
pub use layout_tree::*;
pub use line_breaker::*;
pub use metrics::*;
pub use mourners::*;
