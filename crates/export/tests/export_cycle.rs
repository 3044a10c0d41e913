//! End-to-end export tests

use std::sync::Arc;
use std::time::Duration;

use doc_model::{AnnouncementRecord, DocumentModel};
use export::{ExportConfig, ExportError, ExportSession};
use layout_engine::MournerLayout;
use raster::TextBackend;
use store::PdfExportOptions;

fn sastro() -> AnnouncementRecord {
    AnnouncementRecord::new("Sastro Wijoyo", "Krandekan")
        .with_age(75u32)
        .with_death("Senin Pahing", "2024-03-04", "14.30")
        .with_burial("Selasa Pon", "2024-03-05", "10.00", "Makam Dusun Krandekan")
        .with_mourner("Bambang Sutikno", "Son")
        .with_mourner("", "")
}

fn session(factor: u32, settle_delay: Duration) -> ExportSession {
    let config = ExportConfig::default()
        .with_supersampling(factor)
        .with_settle_delay(settle_delay);
    ExportSession::new(TextBackend::blocks(), config)
}

fn page_count(pdf: &[u8]) -> usize {
    pdf.windows(b"/Type /Page ".len())
        .filter(|w| *w == b"/Type /Page ")
        .count()
}

#[tokio::test]
async fn test_sastro_end_to_end() {
    let model = DocumentModel::validate(&sastro()).unwrap();
    assert_eq!(model.visible_mourner_count(), 1);
    assert_eq!(
        MournerLayout::for_count(model.visible_mourner_count()),
        MournerLayout::SingleColumn
    );

    let session = session(1, Duration::ZERO);
    let file = session.export(&sastro()).await.unwrap();
    assert_eq!(file.file_name, "Pawartos_Lelayu_Sastro_Wijoyo.pdf");
    assert_eq!(file.mime_type, "application/pdf");
    assert!(file.bytes.starts_with(b"%PDF-"));
    assert_eq!(page_count(&file.bytes), 1);

    let dir = tempfile::TempDir::new().unwrap();
    let path = file.write_to_dir(dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "Pawartos_Lelayu_Sastro_Wijoyo.pdf");
    assert_eq!(std::fs::read(path).unwrap(), file.bytes);
}

#[tokio::test]
async fn test_capture_ignores_preview_scale() {
    let session = session(3, Duration::ZERO);
    session.set_preview_scale(0.5).unwrap();

    let bitmap = session.capture(&sastro()).await.unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (2382, 3369));
    assert_eq!(session.preview().scale(), 0.5);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_second_trigger_while_busy_is_rejected() {
    let session = session(1, Duration::from_millis(100));
    let record = sastro();

    let (first, second) = tokio::join!(session.export(&record), session.export(&record));
    assert!(first.is_ok());
    assert!(matches!(second, Err(ExportError::Busy)));
    assert!(!session.is_busy());

    // Nothing carries over to the next cycle
    assert!(session.export(&record).await.is_ok());
}

#[tokio::test]
async fn test_dropped_export_restores_preview() {
    let session = Arc::new(session(1, Duration::from_secs(5)));
    session.set_preview_scale(0.75).unwrap();

    let timed_out = tokio::time::timeout(Duration::from_millis(20), session.export(&sastro())).await;
    assert!(timed_out.is_err());
    assert!(!session.is_busy());
    assert_eq!(session.preview().scale(), 0.75);
}

#[tokio::test]
async fn test_long_mourner_list_spans_pages() {
    let mut record = sastro();
    for i in 0..160 {
        record = record.with_mourner(format!("Kulawarga Ageng Trah Wijoyo {}", i), "Wayah");
    }

    let session = session(1, Duration::ZERO);
    let layout = session.layout(&record).unwrap();
    assert!(layout.mourner_layout.is_grid());
    assert!(layout.height > 1123.0 * 2.0);

    let file = session.export(&record).await.unwrap();
    assert!(page_count(&file.bytes) >= 3);
}

#[tokio::test]
async fn test_pagination_failure_collapses_to_export_failed() {
    let mut config = ExportConfig::default()
        .with_supersampling(1)
        .with_settle_delay(Duration::ZERO);
    config.pdf = PdfExportOptions {
        page: raster::PageSpec {
            width_mm: 0.0,
            height_mm: 297.0,
        },
        ..PdfExportOptions::default()
    };
    let session = ExportSession::new(TextBackend::blocks(), config);
    session.set_preview_scale(0.5).unwrap();

    let err = session.export(&sastro()).await.unwrap_err();
    assert!(matches!(err, ExportError::Failed));
    assert_eq!(err.user_message(), "Gagal membuat PDF.");
    assert!(!session.is_busy());
    assert_eq!(session.preview().scale(), 0.5);
}
