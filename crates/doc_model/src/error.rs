//! Error types for record validation

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A field that must be non-empty (after trimming) before a record can be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredField {
    DeceasedName,
    ResidenceArea,
}

impl RequiredField {
    /// Wire name of the field as the form submits it
    pub fn wire_name(&self) -> &'static str {
        match self {
            RequiredField::DeceasedName => "namaAlmarhum",
            RequiredField::ResidenceArea => "padukuhan",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredField::DeceasedName => write!(f, "deceased name"),
            RequiredField::ResidenceArea => write!(f, "residence area"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingRequiredField { field: RequiredField },
}

impl ValidationError {
    /// Message shown to the person filling in the form
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingRequiredField { .. } => {
                "Nama Alm./Almh dan Padukuhan wajib diisi."
            }
        }
    }

    /// The field that failed validation
    pub fn field(&self) -> RequiredField {
        match self {
            ValidationError::MissingRequiredField { field } => *field,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;
