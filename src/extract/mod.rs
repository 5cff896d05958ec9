//! The extraction pipeline.
//!
//! Stages run strictly in sequence: full-text extraction, vector table
//! extraction (with OCR fallback when it yields nothing), the optional
//! structuring chain, and final assembly. Only an unreadable input aborts
//! the run; every other failure degrades to smaller output.

mod assemble;
mod segment;
mod tables;
mod text;

pub use assemble::{assemble, TableStyle};
pub use segment::FieldSegmenter;
pub use tables::{extract_tables, ocr_tables, structure_grid};
pub use text::full_text;

use std::path::Path;

use crate::error::Result;
use crate::llm::{ProviderConfig, StructuringChain};
use crate::model::DocumentRecord;
use crate::ocr::{OcrOptions, PageRasterizer, PdftoppmRasterizer, TesseractRecognizer, TextRecognizer};
use crate::pdf::{LopdfSource, PdfSource};

/// Options for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Table-merge key convention for the assembled record
    pub table_style: TableStyle,
    /// Run the OCR fallback pages in parallel
    pub parallel_ocr: bool,
    /// OCR binary paths, language, and resolution
    pub ocr: OcrOptions,
    /// Structuring providers; empty disables the chain entirely
    pub providers: Vec<ProviderConfig>,
}

impl ExtractOptions {
    /// Create options with defaults (rule-based only, sequential OCR).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table-merge key convention.
    pub fn with_table_style(mut self, style: TableStyle) -> Self {
        self.table_style = style;
        self
    }

    /// Process OCR pages in parallel.
    pub fn parallel(mut self) -> Self {
        self.parallel_ocr = true;
        self
    }

    /// Process OCR pages one at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel_ocr = false;
        self
    }

    /// Set OCR options.
    pub fn with_ocr(mut self, ocr: OcrOptions) -> Self {
        self.ocr = ocr;
        self
    }

    /// Add a structuring provider to the chain.
    pub fn with_provider(mut self, config: ProviderConfig) -> Self {
        self.providers.push(config);
        self
    }
}

/// The extraction pipeline.
///
/// Holds no state between runs; independent invocations may run
/// concurrently on different documents.
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
        }
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Run the pipeline against a PDF file.
    ///
    /// Fails only when the document itself cannot be opened; any other
    /// trouble yields a sparser record instead of an error.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentRecord> {
        let path = path.as_ref();
        let source = LopdfSource::open(path)?;
        let rasterizer = PdftoppmRasterizer::new(path, self.options.ocr.clone());
        let recognizer = TesseractRecognizer::new(self.options.ocr.clone());
        let chain = StructuringChain::from_configs(&self.options.providers);
        self.run(&source, &rasterizer, &recognizer, &chain)
    }

    /// Run the pipeline against explicit collaborators.
    ///
    /// This is the seam used by tests: any [`PdfSource`], rasterizer,
    /// recognizer, and chain can be swapped in.
    pub fn run<S, R, T>(
        &self,
        source: &S,
        rasterizer: &R,
        recognizer: &T,
        chain: &StructuringChain,
    ) -> Result<DocumentRecord>
    where
        S: PdfSource + ?Sized,
        R: PageRasterizer + Sync + ?Sized,
        T: TextRecognizer + Sync + ?Sized,
    {
        let text = full_text(source);

        let mut tables = extract_tables(source);
        if tables.is_empty() {
            log::info!("no vector tables found; trying OCR fallback");
            tables = ocr_tables(
                source.page_count(),
                rasterizer,
                recognizer,
                self.options.parallel_ocr,
            );
        }

        if !chain.is_empty() {
            if let Some(value) = chain.structure(&text) {
                match DocumentRecord::from_value(value) {
                    Some(record) => return Ok(record),
                    None => {
                        log::warn!("structuring chain returned non-object JSON; using rules")
                    }
                }
            }
        }

        let segmenter = FieldSegmenter::new();
        Ok(assemble(
            &segmenter.header(&text),
            &tables,
            segmenter.flow(&text).as_deref(),
            segmenter.story(&text).as_ref(),
            self.options.table_style,
        ))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
