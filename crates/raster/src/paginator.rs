//! Page slicing
//!
//! A capture is placed full width on physical pages. When the scaled image
//! is taller than one page it is shown again on each following page, shifted
//! up by one page height, until all of it has been revealed. Every page
//! therefore reveals a disjoint band of source rows.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PaginationError;
use crate::Bitmap;

/// Remaining height, in source pixels, below which no further page is added
pub const PAGINATION_TOLERANCE_PX: f64 = 1.0;

/// Physical page size in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageSpec {
    /// A4 portrait, 210 x 297 mm
    pub fn a4() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
        }
    }

    fn validate(&self) -> Result<(), PaginationError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.width_mm) && valid(self.height_mm) {
            Ok(())
        } else {
            Err(PaginationError::InvalidPageSpec {
                width_mm: self.width_mm,
                height_mm: self.height_mm,
            })
        }
    }

    /// Source pixels per millimetre when a bitmap spans the page width
    pub fn pixels_per_mm(&self, bitmap_width: u32) -> f64 {
        bitmap_width as f64 / self.width_mm
    }

    /// Height of one page measured in source pixels
    pub fn page_height_px(&self, bitmap_width: u32) -> f64 {
        self.height_mm * self.pixels_per_mm(bitmap_width)
    }

    /// Height of the whole bitmap once scaled to the page width
    pub fn image_height_mm(&self, bitmap: &Bitmap) -> f64 {
        self.width_mm * (bitmap.height() as f64 / bitmap.width() as f64)
    }
}

/// One physical page worth of a capture
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    pub index: usize,
    /// Source rows revealed on this page
    pub band: Range<u32>,
    /// Vertical offset of the full image on this page (0, -H, -2H, ...)
    pub offset_mm: f64,
    /// Height of the band once placed on the page
    pub placed_height_mm: f64,
    /// The band's pixels
    pub bitmap: Bitmap,
}

/// Number of pages needed for a bitmap of `height` rows
pub fn page_count(height: u32, page_height_px: f64) -> usize {
    let needed = ((height as f64 - PAGINATION_TOLERANCE_PX) / page_height_px).ceil();
    needed.max(1.0) as usize
}

/// Split `bitmap` into pages of `spec`.
///
/// Content that fits one page (within the tolerance) yields exactly one page.
/// The bands are contiguous, disjoint and cover every source row once.
pub fn paginate(bitmap: &Bitmap, spec: PageSpec) -> Result<Vec<PageImage>, PaginationError> {
    spec.validate()?;
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return Err(PaginationError::EmptyBitmap);
    }

    let height = bitmap.height();
    let per_mm = spec.pixels_per_mm(bitmap.width());
    let page_height_px = spec.page_height_px(bitmap.width());
    let count = page_count(height, page_height_px);

    let boundary = |k: usize| -> u32 {
        if k >= count {
            height
        } else {
            ((k as f64 * page_height_px).round() as u32).min(height)
        }
    };

    let pages: Vec<PageImage> = (0..count)
        .map(|k| {
            let band = boundary(k)..boundary(k + 1);
            PageImage {
                index: k,
                offset_mm: -(k as f64) * spec.height_mm,
                placed_height_mm: (band.end - band.start) as f64 / per_mm,
                bitmap: bitmap.crop_rows(band.clone()),
                band,
            }
        })
        .collect();

    debug!(
        pages = pages.len(),
        width = bitmap.width(),
        height,
        image_height_mm = spec.image_height_mm(bitmap),
        "Paginated capture"
    );
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A4 page height for a 2382 px wide capture
    const A4_PAGE_PX: f64 = 297.0 * 2382.0 / 210.0;

    fn bands(pages: &[PageImage]) -> Vec<Range<u32>> {
        pages.iter().map(|p| p.band.clone()).collect()
    }

    #[test]
    fn test_canonical_capture_is_one_page() {
        let bitmap = Bitmap::white(2382, 3369);
        let pages = paginate(&bitmap, PageSpec::a4()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].band, 0..3369);
        assert_eq!(pages[0].offset_mm, 0.0);
        assert!((pages[0].placed_height_mm - 297.0).abs() < 0.05);
        assert_eq!(pages[0].bitmap.height(), 3369);
    }

    #[test]
    fn test_short_capture_is_one_page() {
        let bitmap = Bitmap::white(2382, 1000);
        let pages = paginate(&bitmap, PageSpec::a4()).unwrap();
        assert_eq!(bands(&pages), vec![0..1000]);
    }

    #[test]
    fn test_two_point_three_pages() {
        let height = (A4_PAGE_PX * 2.3).round() as u32;
        let bitmap = Bitmap::white(2382, height);
        let pages = paginate(&bitmap, PageSpec::a4()).unwrap();

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].offset_mm, -297.0);
        assert_eq!(pages[2].offset_mm, -594.0);
        assert_eq!(pages[0].band.start, 0);
        assert_eq!(pages[2].band.end, height);
        assert!(pages[2].placed_height_mm < 297.0 * 0.31);
    }

    #[test]
    fn test_no_trailing_blank_page() {
        let height = (A4_PAGE_PX * 2.0).round() as u32;
        let pages = paginate(&Bitmap::white(2382, height), PageSpec::a4()).unwrap();
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn test_band_pixels_match_source() {
        let mut bitmap = Bitmap::white(210, 700);
        // 297 px pages at 1 px per mm; mark the first row of page two
        bitmap.fill_rect(0, 297, 210, 298, [0, 0, 0]);
        let pages = paginate(&bitmap, PageSpec::a4()).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].band, 297..594);
        assert_eq!(pages[1].bitmap.pixel(0, 0), [0, 0, 0]);
        assert_eq!(pages[0].bitmap.pixel(0, 296), [255, 255, 255]);
    }

    #[test]
    fn test_invalid_inputs() {
        let bitmap = Bitmap::white(10, 10);
        let spec = PageSpec {
            width_mm: 0.0,
            height_mm: 297.0,
        };
        assert!(matches!(
            paginate(&bitmap, spec),
            Err(PaginationError::InvalidPageSpec { .. })
        ));
        assert!(matches!(
            paginate(&Bitmap::white(10, 0), PageSpec::a4()),
            Err(PaginationError::EmptyBitmap)
        ));
    }

    proptest! {
        #[test]
        fn prop_bands_partition_source(width in 50u32..400, height in 1u32..4000) {
            let bitmap = Bitmap::white(width, height);
            let pages = paginate(&bitmap, PageSpec::a4()).unwrap();
            let page_px = PageSpec::a4().page_height_px(width);

            prop_assert!(!pages.is_empty());
            prop_assert_eq!(pages[0].band.start, 0);
            prop_assert_eq!(pages.last().unwrap().band.end, height);
            for pair in pages.windows(2) {
                prop_assert_eq!(pair[0].band.end, pair[1].band.start);
            }
            for page in &pages {
                prop_assert!(page.band.start < page.band.end);
                prop_assert_eq!(page.bitmap.height(), page.band.end - page.band.start);
            }
            if (height as f64) <= page_px + PAGINATION_TOLERANCE_PX {
                prop_assert_eq!(pages.len(), 1);
            }
        }
    }
}
