//! Error types for rasterization and pagination

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Bitmap of {width}x{height} pixels exceeds the budget of {budget} pixels")]
    TooLarge { width: u64, height: u64, budget: u64 },

    #[error("Invalid supersampling factor: {0}")]
    InvalidFactor(u32),

    #[error("Font error: {0}")]
    Font(String),
}

#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("Cannot paginate an empty bitmap")]
    EmptyBitmap,

    #[error("Invalid page size: {width_mm}x{height_mm} mm")]
    InvalidPageSpec { width_mm: f64, height_mm: f64 },
}

pub type Result<T> = std::result::Result<T, CaptureError>;
