//! # unsheet
//!
//! Converts a semi-structured worksheet PDF — a name/date header, tabular
//! sections, a "Mapping the Flow" diagram region, and a narrative "Story"
//! section — into one normalized JSON record.
//!
//! The pipeline is a layered fallback chain: vector table extraction falls
//! back to image OCR when the page layout yields nothing, and external
//! structuring services (when configured) fall back to rule-based
//! segmentation when every attempt fails. Heuristics are tuned to one
//! document family and degrade to partial or empty fields rather than
//! erroring on others; only an unreadable input aborts a run.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unsheet::{extract_file, output, JsonFormat};
//!
//! fn main() -> unsheet::Result<()> {
//!     let record = extract_file("worksheet.pdf")?;
//!     output::write_json(&record, "output.json", JsonFormat::Pretty)?;
//!     Ok(())
//! }
//! ```
//!
//! ## With a structuring chain
//!
//! ```no_run
//! use unsheet::{extract_file_with_options, ExtractOptions, ProviderConfig, ProviderKind};
//!
//! let options = ExtractOptions::new()
//!     .with_provider(ProviderConfig::new(ProviderKind::OpenAi, "sk-...").with_priority(0))
//!     .with_provider(ProviderConfig::new(ProviderKind::Gemini, "AI...").with_priority(1));
//! let record = extract_file_with_options("worksheet.pdf", options).unwrap();
//! ```

pub mod detect;
pub mod error;
pub mod extract;
pub mod llm;
pub mod model;
pub mod ocr;
pub mod output;
pub mod pdf;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{ExtractOptions, Extractor, FieldSegmenter, TableStyle};
pub use llm::{ProviderConfig, ProviderError, ProviderKind, StructuringChain, StructuringProvider};
pub use model::{
    DocumentRecord, HeaderFields, RawTableGrid, StorySection, StructuredTable, TableRecord,
};
pub use ocr::{OcrOptions, PageImage, PageRasterizer, TextRecognizer};
pub use output::JsonFormat;
pub use pdf::{LopdfSource, PdfSource};

use std::path::Path;

/// Run the pipeline on a PDF file with default options.
///
/// Rule-based extraction only; no structuring providers are consulted.
///
/// # Example
///
/// ```no_run
/// use unsheet::extract_file;
///
/// let record = extract_file("worksheet.pdf").unwrap();
/// println!("name: {:?}", record.name());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<DocumentRecord> {
    Extractor::new().extract_file(path)
}

/// Run the pipeline on a PDF file with custom options.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<DocumentRecord> {
    Extractor::with_options(options).extract_file(path)
}

/// Run the pipeline and serialize the record to JSON in one step.
pub fn extract_to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let record = extract_file(path)?;
    output::to_json(&record, format)
}
