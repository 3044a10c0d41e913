//! Render Model - Layout to render conversion
//!
//! This crate converts the announcement layout into render items that the
//! rasterizer draws, and holds the on-screen preview state.

mod converter;
mod error;
mod render_item;
mod viewport;

pub use converter::*;
pub use error::*;
pub use render_item::*;
pub use viewport::*;
