//! Error types for render model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid preview scale: {0}")]
    InvalidScale(f64),
}

pub type Result<T> = std::result::Result<T, RenderError>;
