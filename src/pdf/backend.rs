//! PDF source abstraction.
//!
//! [`PdfSource`] is the seam between the extraction pipeline and the
//! concrete PDF library: per-page plain text and per-page raw table grids.
//! [`LopdfSource`] is the lopdf-backed implementation.

use std::path::Path;

use lopdf::{Document as LopdfDocument, ObjectId};

use crate::detect::detect_pdf_from_path;
use crate::error::{Error, Result};
use crate::model::RawTableGrid;

use super::grid::GridDetector;
use super::span::extract_page_spans;

/// Abstract interface for document access.
///
/// Page numbers are 1-based, matching PDF conventions.
pub trait PdfSource {
    /// Total number of pages.
    fn page_count(&self) -> u32;

    /// Plain text content of one page.
    fn page_text(&self, page: u32) -> Result<String>;

    /// Raw table grids detected on one page, in top-to-bottom order.
    fn page_grids(&self, page: u32) -> Result<Vec<RawTableGrid>>;
}

/// Concrete [`PdfSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    detector: GridDetector,
}

impl LopdfSource {
    /// Open a PDF file.
    ///
    /// Any failure to open or decode the document is fatal for the whole
    /// pipeline and surfaces as [`Error::DocumentUnreadable`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect_pdf_from_path(path)?;

        let doc = LopdfDocument::load(path)
            .map_err(|e| Error::DocumentUnreadable(format!("{}: {}", path.display(), e)))?;
        if doc.is_encrypted() {
            return Err(Error::DocumentUnreadable(
                "document is encrypted".to_string(),
            ));
        }

        Ok(Self {
            doc,
            detector: GridDetector::new(),
        })
    }

    /// Open a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        crate::detect::detect_pdf_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)
            .map_err(|e| Error::DocumentUnreadable(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(Error::DocumentUnreadable(
                "document is encrypted".to_string(),
            ));
        }

        Ok(Self {
            doc,
            detector: GridDetector::new(),
        })
    }

    /// Use a custom grid detector.
    pub fn with_detector(mut self, detector: GridDetector) -> Self {
        self.detector = detector;
        self
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, pages.len() as u32))
    }
}

impl PdfSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String> {
        self.doc
            .extract_text(&[page])
            .map_err(|e| Error::TextExtract(format!("page {}: {}", page, e)))
    }

    fn page_grids(&self, page: u32) -> Result<Vec<RawTableGrid>> {
        let page_id = self.page_id(page)?;
        let spans = extract_page_spans(&self.doc, page_id)?;
        Ok(self.detector.detect(spans))
    }
}
