//! Export settings management
//!
//! Settings live in a `settings.json` file. A missing file means defaults; a
//! file that fails to parse is logged and replaced by defaults in memory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use raster::{PageSpec, DEFAULT_SUPERSAMPLING};
use serde::{Deserialize, Serialize};

use crate::pdf::{ImageEncoding, PdfExportOptions};
use crate::Result;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// How exports are captured and encoded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    /// Capture resolution multiplier
    pub supersampling: u32,
    /// Wait before capturing so the preview can settle
    pub settle_delay_ms: u64,
    pub jpeg_quality: u8,
    pub image_encoding: ImageEncoding,
    /// Font file for rendering; system serif when absent
    pub font_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub page: PageSpec,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            supersampling: DEFAULT_SUPERSAMPLING,
            settle_delay_ms: 300,
            jpeg_quality: 100,
            image_encoding: ImageEncoding::Jpeg,
            font_path: None,
            output_dir: PathBuf::from("."),
            page: PageSpec::a4(),
        }
    }
}

impl ExportSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn pdf_options(&self) -> PdfExportOptions {
        PdfExportOptions::new()
            .with_image_encoding(self.image_encoding)
            .with_jpeg_quality(self.jpeg_quality)
            .with_page(self.page)
    }
}

/// Loads, saves and updates [`ExportSettings`]
pub struct SettingsManager {
    settings_path: PathBuf,
    current: ExportSettings,
}

impl SettingsManager {
    /// Manager for `settings.json` inside `app_data_dir`
    pub fn new(app_data_dir: impl AsRef<Path>) -> Self {
        Self::from_file(app_data_dir.as_ref().join(SETTINGS_FILE_NAME))
    }

    /// Manager for an explicit settings file
    pub fn from_file(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            current: ExportSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn get(&self) -> &ExportSettings {
        &self.current
    }

    pub async fn load(&mut self) -> Result<&ExportSettings> {
        self.current = if tokio::fs::try_exists(&self.settings_path).await? {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            parse_or_default(&content, &self.settings_path)
        } else {
            ExportSettings::default()
        };
        Ok(&self.current)
    }

    /// Load synchronously, for startup paths outside the runtime
    pub fn load_sync(&mut self) -> Result<&ExportSettings> {
        self.current = if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            parse_or_default(&content, &self.settings_path)
        } else {
            ExportSettings::default()
        };
        Ok(&self.current)
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    pub async fn update(&mut self, settings: ExportSettings) -> Result<()> {
        self.current = settings;
        self.save().await
    }

    pub fn update_sync(&mut self, settings: ExportSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }

    pub fn reset_sync(&mut self) -> Result<&ExportSettings> {
        self.current = ExportSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }
}

fn parse_or_default(content: &str, path: &Path) -> ExportSettings {
    match serde_json::from_str::<ExportSettings>(content) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                "Failed to parse settings file, using defaults: {}",
                e
            );
            ExportSettings::default()
        }
    }
}
