//! Error types for the export cycle

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Validation error: {0}")]
    Validation(#[from] doc_model::ValidationError),

    #[error("An export is already running")]
    Busy,

    /// Capture, pagination or PDF assembly failed. The cause is logged.
    #[error("Export failed")]
    Failed,
}

impl ExportError {
    /// Message shown to the person who pressed download
    pub fn user_message(&self) -> &'static str {
        match self {
            ExportError::Validation(e) => e.user_message(),
            ExportError::Busy => "Sedang memproses PDF, mohon tunggu.",
            ExportError::Failed => "Gagal membuat PDF.",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
