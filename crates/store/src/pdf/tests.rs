//! Whole-document tests for the PDF exporter

use raster::{paginate, Bitmap, PageSpec};

use super::*;

fn count(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle.as_bytes())
        .count()
}

fn capture_like(height: u32) -> Bitmap {
    let mut bitmap = Bitmap::white(210, height);
    bitmap.fill_rect(10, 10, 200, 40, [0, 0, 0]);
    bitmap
}

#[test]
fn test_single_page_export() {
    let pages = paginate(&capture_like(297), PageSpec::a4()).unwrap();
    let file = export(&pages, "Sastro Wijoyo", &PdfExportOptions::default()).unwrap();

    assert_eq!(file.file_name, "Pawartos_Lelayu_Sastro_Wijoyo.pdf");
    assert_eq!(file.mime_type, "application/pdf");
    assert!(file.bytes.starts_with(b"%PDF-1.4"));
    assert_eq!(count(&file.bytes, "/Type /Page "), 1);
    assert_eq!(count(&file.bytes, "/Count 1"), 1);
    assert_eq!(count(&file.bytes, "/DCTDecode"), 1);
    assert!(count(&file.bytes, "(Pawartos Lelayu Sastro Wijoyo)") >= 1);
}

#[test]
fn test_tall_capture_spans_pages_in_order() {
    // 2.3 page heights
    let pages = paginate(&capture_like(683), PageSpec::a4()).unwrap();
    assert_eq!(pages.len(), 3);

    let file = export(&pages, "Sastro Wijoyo", &PdfExportOptions::default()).unwrap();
    assert_eq!(count(&file.bytes, "/Type /Page "), 3);
    assert_eq!(count(&file.bytes, "/Count 3"), 1);
    // Each page's resources name exactly one image of its own
    for name in ["/Im0", "/Im1", "/Im2"] {
        let resource = format!("/XObject << {} ", name);
        assert_eq!(count(&file.bytes, &resource), 1, "{}", resource);
    }
    assert_eq!(count(&file.bytes, "/XObject << "), 3);
}

#[test]
fn test_flate_encoding_without_content_compression() {
    let pages = paginate(&capture_like(100), PageSpec::a4()).unwrap();
    let options = PdfExportOptions::new()
        .with_image_encoding(ImageEncoding::Flate)
        .with_compression(false);
    let file = export(&pages, "Sastro", &options).unwrap();
    let text = String::from_utf8_lossy(&file.bytes);

    assert_eq!(count(&file.bytes, "/DCTDecode"), 0);
    assert!(text.contains("/Filter /FlateDecode"));
    // 100 source rows on a 210 px wide A4 page are 100 mm tall
    assert!(text.contains("595.2756 0 0 283.4646 0 558.4252 cm\n/Im0 Do"));
}

#[test]
fn test_custom_title_wins() {
    let pages = paginate(&capture_like(50), PageSpec::a4()).unwrap();
    let options = PdfExportOptions::new().with_title("Lelayu");
    let file = export(&pages, "Sastro", &options).unwrap();
    assert_eq!(count(&file.bytes, "/Title (Lelayu)"), 1);
}

#[test]
fn test_empty_page_list_is_an_error() {
    assert!(matches!(
        export(&[], "Sastro", &PdfExportOptions::default()),
        Err(PdfError::InvalidDocument(_))
    ));
}
