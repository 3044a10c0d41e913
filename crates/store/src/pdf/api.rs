//! PDF export public API

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use raster::PageImage;
use serde::Serialize;
use tracing::{debug, info};

use super::options::PdfExportOptions;
use super::writer::{PdfDocumentWriter, PdfError, Result};

pub const FILE_NAME_PREFIX: &str = "Pawartos_Lelayu_";
pub const FILE_NAME_SUFFIX: &str = ".pdf";
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A finished document ready to be handed to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFile {
    pub file_name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl OutputFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write into `dir` under the file's own name, replacing any earlier
    /// export of the same name. Returns the written path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.target_path(dir.as_ref())?;
        std::fs::create_dir_all(dir.as_ref())?;
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "Wrote export");
        Ok(path)
    }

    pub async fn save_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.target_path(dir.as_ref())?;
        tokio::fs::create_dir_all(dir.as_ref()).await?;
        tokio::fs::write(&path, &self.bytes).await?;
        info!(path = %path.display(), bytes = self.bytes.len(), "Wrote export");
        Ok(path)
    }

    /// `data:application/pdf;base64,...`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    fn target_path(&self, dir: &Path) -> Result<PathBuf> {
        let name = Path::new(&self.file_name);
        if name.file_name().map(|n| n == name.as_os_str()) != Some(true) {
            return Err(PdfError::InvalidDocument(format!(
                "File name is not a plain name: {}",
                self.file_name
            )));
        }
        Ok(dir.join(name))
    }
}

/// `Pawartos_Lelayu_<name>.pdf`, every whitespace run in the name replaced
/// by one underscore
pub fn export_file_name(deceased_name: &str) -> String {
    let mut name = String::with_capacity(FILE_NAME_PREFIX.len() + deceased_name.len() + FILE_NAME_SUFFIX.len());
    name.push_str(FILE_NAME_PREFIX);
    let mut in_space = false;
    for c in deceased_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
        } else {
            name.push(c);
            in_space = false;
        }
    }
    name.push_str(FILE_NAME_SUFFIX);
    name
}

/// Assemble page images into one PDF named after the deceased
pub fn export(pages: &[PageImage], deceased_name: &str, options: &PdfExportOptions) -> Result<OutputFile> {
    let mut options = options.clone();
    if options.title.is_none() {
        options.title = Some(format!("Pawartos Lelayu {}", deceased_name));
    }

    let bytes = PdfDocumentWriter::new(options).write_to_bytes(pages)?;
    let file_name = export_file_name(deceased_name);
    debug!(pages = pages.len(), bytes = bytes.len(), file_name = %file_name, "Assembled PDF");

    Ok(OutputFile {
        file_name,
        mime_type: PDF_MIME_TYPE.to_string(),
        bytes,
    })
}
