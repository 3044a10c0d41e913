//! Export session
//!
//! One export runs at a time. While it runs the preview is marked busy and
//! its scale is pinned to 1 so the capture always has canonical dimensions;
//! [`CaptureGuard`] puts both back however the export ends, including when
//! the export future is dropped. A capture already handed to the blocking
//! pool keeps the guard until it finishes, so an abandoned capture never
//! overlaps the next one.

use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use doc_model::{AnnouncementRecord, DocumentModel};
use layout_engine::{LayoutEngine, SurfaceLayout, TextMeasure};
use raster::{paginate, Bitmap, Rasterizer, TextBackend, DEFAULT_SUPERSAMPLING};
use render_model::{PreviewState, RenderConverter, RenderedSurface};
use store::{ExportSettings, OutputFile, PdfExportOptions};
use tracing::{debug, error, info, warn};

use crate::{ExportError, Result};

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub supersampling: u32,
    /// Wait before capturing so the preview can settle
    pub settle_delay: Duration,
    /// Page size, image encoding and document metadata
    pub pdf: PdfExportOptions,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            supersampling: DEFAULT_SUPERSAMPLING,
            settle_delay: DEFAULT_SETTLE_DELAY,
            pdf: PdfExportOptions::default(),
        }
    }
}

impl From<&ExportSettings> for ExportConfig {
    fn from(settings: &ExportSettings) -> Self {
        Self {
            supersampling: settings.supersampling,
            settle_delay: settings.settle_delay(),
            pdf: settings.pdf_options(),
        }
    }
}

impl ExportConfig {
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_supersampling(mut self, factor: u32) -> Self {
        self.supersampling = factor;
        self
    }
}

fn lock(preview: &Mutex<PreviewState>) -> MutexGuard<'_, PreviewState> {
    preview.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Holds the preview pinned for a capture; restores it on drop
pub struct CaptureGuard {
    preview: Arc<Mutex<PreviewState>>,
    saved_scale: f64,
}

impl CaptureGuard {
    /// Pin the preview, or fail with [`ExportError::Busy`] if a capture is
    /// already running
    pub fn acquire(preview: &Arc<Mutex<PreviewState>>) -> Result<Self> {
        let saved_scale = lock(preview).pin_for_capture().ok_or(ExportError::Busy)?;
        Ok(Self {
            preview: Arc::clone(preview),
            saved_scale,
        })
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        lock(&self.preview).release_capture(self.saved_scale);
        debug!(scale = self.saved_scale, "Preview restored");
    }
}

/// Log the cause and collapse it into [`ExportError::Failed`]
fn failed(stage: &'static str, cause: impl Display) -> ExportError {
    error!(stage, error = %cause, "Export failed");
    ExportError::Failed
}

/// Runs the export cycle for announcement records
pub struct ExportSession {
    engine: LayoutEngine<Arc<dyn TextMeasure>>,
    converter: RenderConverter,
    rasterizer: Rasterizer,
    preview: Arc<Mutex<PreviewState>>,
    config: ExportConfig,
}

impl ExportSession {
    pub fn new(backend: TextBackend, config: ExportConfig) -> Self {
        let rasterizer = match Rasterizer::new(backend.painter.clone()).with_factor(config.supersampling) {
            Ok(rasterizer) => rasterizer,
            Err(e) => {
                warn!(error = %e, "Using the default supersampling factor");
                Rasterizer::new(backend.painter.clone())
            }
        };
        debug!(
            painter = backend.painter_name(),
            factor = rasterizer.factor(),
            "Export session ready"
        );

        Self {
            engine: LayoutEngine::new(backend.measure),
            converter: RenderConverter::default(),
            rasterizer,
            preview: Arc::new(Mutex::new(PreviewState::new())),
            config,
        }
    }

    /// Session using the configured font, the system serif or box glyphs
    pub fn from_settings(settings: &ExportSettings) -> Self {
        let backend = TextBackend::resolve(settings.font_path.as_deref());
        Self::new(backend, ExportConfig::from(settings))
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Snapshot of the preview state
    pub fn preview(&self) -> PreviewState {
        lock(&self.preview).clone()
    }

    pub fn set_preview_scale(&self, scale: f64) -> std::result::Result<(), render_model::RenderError> {
        lock(&self.preview).set_scale(scale)
    }

    /// Fit the preview to a viewport width, returns the new scale
    pub fn fit_preview(&self, viewport_width: f64) -> f64 {
        lock(&self.preview).fit_to_width(viewport_width)
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.preview).is_busy()
    }

    pub fn layout(&self, record: &AnnouncementRecord) -> Result<SurfaceLayout> {
        let model = DocumentModel::validate(record)?;
        Ok(self.engine.layout(&model))
    }

    /// The surface as the preview currently shows it
    pub fn presented(&self, record: &AnnouncementRecord) -> Result<RenderedSurface> {
        let layout = self.layout(record)?;
        let surface = self.converter.convert(&layout).map_err(|e| failed("render", e))?;
        Ok(lock(&self.preview).presented(&surface))
    }

    /// Capture a record at the supersampling factor
    pub async fn capture(&self, record: &AnnouncementRecord) -> Result<Bitmap> {
        let model = DocumentModel::validate(record)?;
        let guard = Arc::new(CaptureGuard::acquire(&self.preview)?);
        self.capture_pinned(&model, &guard).await
    }

    /// Run the whole cycle and return the finished PDF
    pub async fn export(&self, record: &AnnouncementRecord) -> Result<OutputFile> {
        let model = DocumentModel::validate(record)?;
        let guard = Arc::new(CaptureGuard::acquire(&self.preview)?);
        info!(deceased = model.deceased_name(), "Export started");

        let bitmap = self.capture_pinned(&model, &guard).await?;
        let pages = paginate(&bitmap, self.config.pdf.page).map_err(|e| failed("paginate", e))?;
        let file = store::export(&pages, model.deceased_name(), &self.config.pdf)
            .map_err(|e| failed("pdf", e))?;

        info!(
            file_name = %file.file_name,
            pages = pages.len(),
            bytes = file.len(),
            "Export finished"
        );
        Ok(file)
    }

    /// The blocking capture holds its own handle on `guard`
    async fn capture_pinned(&self, model: &DocumentModel, guard: &Arc<CaptureGuard>) -> Result<Bitmap> {
        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }

        let layout = self.engine.layout(model);
        let surface = self.converter.convert(&layout).map_err(|e| failed("render", e))?;
        let presented = lock(&self.preview).presented(&surface);

        let rasterizer = self.rasterizer.clone();
        let held = Arc::clone(guard);
        tokio::task::spawn_blocking(move || {
            let _held = held;
            rasterizer.capture(&presented)
        })
        .await
        .map_err(|e| failed("capture task", e))?
        .map_err(|e| failed("capture", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::ValidationError;
    use layout_engine::EstimatedMetrics;
    use raster::GlyphPainter;
    use render_model::GlyphRun;
    use std::sync::mpsc::{channel, Receiver, Sender};

    fn quick_session() -> ExportSession {
        let config = ExportConfig::default()
            .with_settle_delay(Duration::ZERO)
            .with_supersampling(1);
        ExportSession::new(TextBackend::blocks(), config)
    }

    #[test]
    fn test_guard_restores_on_drop() {
        let session = quick_session();
        session.set_preview_scale(0.5).unwrap();
        {
            let _guard = CaptureGuard::acquire(&session.preview).unwrap();
            assert!(session.is_busy());
            assert_eq!(session.preview().scale(), 1.0);
            assert!(matches!(
                CaptureGuard::acquire(&session.preview),
                Err(ExportError::Busy)
            ));
        }
        assert!(!session.is_busy());
        assert_eq!(session.preview().scale(), 0.5);
    }

    #[test]
    fn test_invalid_factor_falls_back() {
        let session = ExportSession::new(
            TextBackend::blocks(),
            ExportConfig::default().with_supersampling(0),
        );
        assert_eq!(session.rasterizer.factor(), DEFAULT_SUPERSAMPLING);
    }

    #[test]
    fn test_config_from_settings() {
        let settings = ExportSettings {
            supersampling: 2,
            settle_delay_ms: 10,
            ..Default::default()
        };
        let config = ExportConfig::from(&settings);
        assert_eq!(config.supersampling, 2);
        assert_eq!(config.settle_delay, Duration::from_millis(10));
        assert_eq!(config.pdf.jpeg_quality, 100);
    }

    #[test]
    fn test_presented_follows_preview_scale() {
        let session = quick_session();
        let record = AnnouncementRecord::new("Sastro Wijoyo", "Krandekan");
        assert_eq!(session.presented(&record).unwrap().width, 794.0);

        session.fit_preview(397.0);
        assert_eq!(session.presented(&record).unwrap().width, 397.0);
    }

    #[tokio::test]
    async fn test_validation_leaves_preview_untouched() {
        let session = quick_session();
        session.set_preview_scale(0.5).unwrap();

        let err = session
            .export(&AnnouncementRecord::new("", "Krandekan"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExportError::Validation(ValidationError::MissingRequiredField { .. })
        ));
        assert_eq!(err.user_message(), "Nama Alm./Almh dan Padukuhan wajib diisi.");
        assert!(!session.is_busy());
        assert_eq!(session.preview().scale(), 0.5);
    }

    #[tokio::test]
    async fn test_capture_at_factor_one() {
        let session = quick_session();
        let bitmap = session
            .capture(&AnnouncementRecord::new("Sastro Wijoyo", "Krandekan"))
            .await
            .unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (794, 1123));
        assert!(bitmap.ink_pixels() > 0);
    }

    /// Box glyphs that stall on the first run until released
    struct GatedPainter {
        started: Mutex<Option<Sender<()>>>,
        release: Mutex<Receiver<()>>,
    }

    impl GlyphPainter for GatedPainter {
        fn paint_run(&self, _bitmap: &mut Bitmap, _run: &GlyphRun) {
            if let Some(started) = self.started.lock().unwrap().take() {
                let _ = started.send(());
                let _ = self.release.lock().unwrap().recv();
            }
        }

        fn name(&self) -> &'static str {
            "gated"
        }
    }

    #[tokio::test]
    async fn test_abandoned_capture_keeps_session_busy() {
        let (started_tx, started_rx) = channel();
        let (release_tx, release_rx) = channel();
        let backend = TextBackend {
            painter: Arc::new(GatedPainter {
                started: Mutex::new(Some(started_tx)),
                release: Mutex::new(release_rx),
            }),
            measure: Arc::new(EstimatedMetrics::new()),
        };
        let config = ExportConfig::default()
            .with_settle_delay(Duration::ZERO)
            .with_supersampling(1);
        let session = ExportSession::new(backend, config);
        session.set_preview_scale(0.5).unwrap();
        let record = AnnouncementRecord::new("Sastro Wijoyo", "Krandekan");

        {
            let export = session.export(&record);
            tokio::pin!(export);
            let capture_started = tokio::task::spawn_blocking(move || started_rx.recv());
            tokio::select! {
                _ = &mut export => panic!("capture finished while the painter was stalled"),
                started = capture_started => started.unwrap().unwrap(),
            }
        }

        // The export future is gone but its capture is still running
        assert!(session.is_busy());
        assert!(matches!(session.export(&record).await, Err(ExportError::Busy)));

        release_tx.send(()).unwrap();
        for _ in 0..500 {
            if !session.is_busy() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!session.is_busy());
        assert_eq!(session.preview().scale(), 0.5);
    }
}
