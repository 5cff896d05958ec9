//! Error types for the unsheet library.

use std::io;
use thiserror::Error;

/// Result type alias for unsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a worksheet document.
///
/// Only [`Error::DocumentUnreadable`] aborts a pipeline run; every other
/// failure is absorbed at the stage that produced it and degrades the
/// output instead of propagating.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input document could not be opened or decoded at all.
    #[error("unreadable document: {0}")]
    DocumentUnreadable(String),

    /// Error parsing PDF structure after the document was opened.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Error extracting text content from a page.
    #[error("text extraction error: {0}")]
    TextExtract(String),

    /// Error rasterizing a page for the OCR fallback.
    #[error("rasterization error: {0}")]
    Rasterize(String),

    /// Error running text recognition on a page image.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Page number is out of range.
    #[error("page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error serializing the assembled record.
    #[error("output error: {0}")]
    Output(String),
}
