//! Raster - Supersampled capture and page slicing
//!
//! This crate draws a `RenderedSurface` into an opaque RGB bitmap at a fixed
//! supersampling factor and cuts the bitmap into physical page bands.

mod bitmap;
mod error;
mod paginator;
mod painter;
mod rasterizer;

pub use bitmap::*;
pub use error::*;
pub use paginator::*;
pub use painter::*;
pub use rasterizer::*;
