//! Error types for layout engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid surface geometry: {0}")]
    InvalidGeometry(String),

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::ValidationError),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
