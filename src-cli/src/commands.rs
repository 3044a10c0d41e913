//! Subcommand implementations

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use doc_model::AnnouncementRecord;
use export::{ExportConfig, ExportError, ExportSession};
use layout_engine::SurfaceLayout;
use raster::TextBackend;
use store::{ExportSettings, JsonFileRecordStore, SettingsManager, StoredRecord};
use tracing::{debug, info};

pub struct ExportArgs {
    pub record: PathBuf,
    pub out: Option<PathBuf>,
    pub settings: Option<PathBuf>,
    pub preview_scale: Option<f64>,
    pub font: Option<PathBuf>,
}

/// Read a record in either the form's field names or the English ones
pub fn read_record(path: &Path) -> Result<AnnouncementRecord> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid record in {}", path.display()))
}

async fn load_settings(path: Option<&Path>) -> Result<ExportSettings> {
    let Some(path) = path else {
        return Ok(ExportSettings::default());
    };
    let mut manager = SettingsManager::from_file(path);
    let settings = manager
        .load()
        .await
        .with_context(|| format!("Cannot load settings from {}", path.display()))?;
    Ok(settings.clone())
}

/// Failures shown to the user carry only the form message; the cause is
/// already logged
fn user_facing(e: ExportError) -> anyhow::Error {
    anyhow!(e.user_message())
}

/// Export a record and return the path of the written PDF
pub async fn export(args: ExportArgs) -> Result<PathBuf> {
    let record = read_record(&args.record)?;
    let mut settings = load_settings(args.settings.as_deref()).await?;
    if args.font.is_some() {
        settings.font_path = args.font;
    }

    let session = ExportSession::from_settings(&settings);
    if let Some(scale) = args.preview_scale {
        session.set_preview_scale(scale).context("Invalid preview scale")?;
    }

    let file = session.export(&record).await.map_err(user_facing)?;
    let out = args.out.unwrap_or(settings.output_dir);
    let path = file.save_to_dir(&out).await?;
    info!(path = %path.display(), "Export written");
    Ok(path)
}

/// Validate a record and store it as JSON under `store_dir`
pub fn submit(record_path: &Path, store_dir: &Path) -> Result<StoredRecord> {
    let record = read_record(record_path)?;
    let store = JsonFileRecordStore::new(store_dir);
    let stored = store::submit(&store, &record)?;
    debug!(id = %stored.id, "Record stored");
    Ok(stored)
}

pub fn preview(record_path: &Path, font: Option<&Path>) -> Result<Vec<String>> {
    let record = read_record(record_path)?;
    preview_lines(&record, TextBackend::resolve(font))
}

fn preview_lines(record: &AnnouncementRecord, backend: TextBackend) -> Result<Vec<String>> {
    let session = ExportSession::new(backend, ExportConfig::default());
    let layout = session.layout(record).map_err(user_facing)?;
    Ok(describe(&layout))
}

/// One row per line: role, bounds, text. A summary row comes last.
fn describe(layout: &SurfaceLayout) -> Vec<String> {
    let mut rows: Vec<String> = layout
        .lines
        .iter()
        .map(|line| {
            let b = line.bounds;
            format!(
                "{:<20} {:>7.1} {:>7.1} {:>7.1} {:>6.1}  {}",
                format!("{:?}", line.role),
                b.x,
                b.y,
                b.width,
                b.height,
                line.text()
            )
        })
        .collect();
    rows.push(format!(
        "-- {} lines, surface {:.0}x{:.0}, mourners {:?}",
        layout.lines.len(),
        layout.width,
        layout.height,
        layout.mourner_layout
    ));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FORM_RECORD: &str = r#"{
        "namaAlmarhum": "Sastro Wijoyo",
        "usia": "75",
        "padukuhan": "Krandekan",
        "hariMeninggal": "Senin Pahing",
        "tanggalMeninggal": "2024-03-04",
        "jamMeninggal": "14.30",
        "pihakBerduka": [
            {"nama": "Bambang Sutikno", "hubungan": "Son"},
            {"nama": "", "hubungan": ""}
        ]
    }"#;

    fn write_record(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("record.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_record_with_form_names() {
        let dir = TempDir::new().unwrap();
        let record = read_record(&write_record(&dir, FORM_RECORD)).unwrap();
        assert_eq!(record.deceased_name, "Sastro Wijoyo");
        assert_eq!(record.residence_area, "Krandekan");
        assert_eq!(record.mourners.len(), 2);
    }

    #[test]
    fn test_read_record_reports_path() {
        let dir = TempDir::new().unwrap();
        let err = read_record(&dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.json"));
    }

    #[test]
    fn test_preview_lists_lines() {
        let record: AnnouncementRecord = serde_json::from_str(FORM_RECORD).unwrap();
        let rows = preview_lines(&record, TextBackend::blocks()).unwrap();
        assert!(rows.iter().any(|r| r.starts_with("DeceasedName") && r.contains("SASTRO WIJOYO")));
        assert!(rows.iter().any(|r| r.contains("Bambang Sutikno")));
        assert!(rows.last().unwrap().contains("SingleColumn"));
    }

    #[test]
    fn test_preview_shows_validation_message() {
        let record = AnnouncementRecord::new("  ", "Krandekan");
        let err = preview_lines(&record, TextBackend::blocks()).unwrap_err();
        assert_eq!(err.to_string(), "Nama Alm./Almh dan Padukuhan wajib diisi.");
    }

    #[test]
    fn test_submit_stores_json() {
        let dir = TempDir::new().unwrap();
        let record_path = write_record(&dir, FORM_RECORD);
        let store_dir = dir.path().join("records");

        let stored = submit(&record_path, &store_dir).unwrap();
        assert_eq!(stored.record.deceased_name, "Sastro Wijoyo");
        assert_eq!(stored.record.age_years, 75);
        assert_eq!(stored.record.mourners.len(), 1);
        assert!(store_dir.join(format!("{}.json", stored.id)).exists());
    }

    #[test]
    fn test_submit_rejects_blank_area() {
        let dir = TempDir::new().unwrap();
        let record_path = write_record(&dir, r#"{"namaAlmarhum": "Sastro", "padukuhan": " "}"#);
        let err = submit(&record_path, &dir.path().join("records")).unwrap_err();
        assert!(err.to_string().contains("Nama Almarhum dan Padukuhan harus diisi."));
    }

    #[tokio::test]
    async fn test_export_writes_pdf() {
        let dir = TempDir::new().unwrap();
        let record_path = write_record(&dir, FORM_RECORD);
        let settings_path = dir.path().join("settings.json");
        std::fs::write(&settings_path, r#"{"supersampling": 1, "settleDelayMs": 0}"#).unwrap();

        let path = export(ExportArgs {
            record: record_path,
            out: Some(dir.path().join("out")),
            settings: Some(settings_path),
            preview_scale: Some(0.5),
            font: None,
        })
        .await
        .unwrap();

        assert_eq!(path.file_name().unwrap(), "Pawartos_Lelayu_Sastro_Wijoyo.pdf");
        assert!(std::fs::read(path).unwrap().starts_with(b"%PDF-"));
    }
}
