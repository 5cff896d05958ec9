//! Full-text extraction.

use crate::pdf::PdfSource;

/// Concatenate every page's plain text in page order, one newline per page
/// boundary.
///
/// No normalization is applied here; the field segmenter owns all of that.
/// A page that fails to yield text contributes an empty string so later
/// pages keep their boundaries.
pub fn full_text<S: PdfSource + ?Sized>(source: &S) -> String {
    let mut pages = Vec::with_capacity(source.page_count() as usize);
    for page in 1..=source.page_count() {
        match source.page_text(page) {
            Ok(text) => pages.push(text),
            Err(e) => {
                log::warn!("failed to extract text from page {}: {}", page, e);
                pages.push(String::new());
            }
        }
    }
    pages.join("\n")
}
