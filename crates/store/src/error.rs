//! Error types for storage operations

use thiserror::Error;
use uuid::Uuid;

use crate::pdf::PdfError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] doc_model::ValidationError),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
