//! OCR collaborators: page rasterization and text recognition.
//!
//! Both sides are trait seams so the pipeline can be exercised without
//! external binaries. The shipped implementations shell out to poppler's
//! `pdftoppm` and to the `tesseract` CLI and fail gracefully when a
//! binary is missing.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// A rasterized page, held as encoded PNG bytes.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// PNG-encoded image data
    pub png: Vec<u8>,
}

/// Renders document pages to images for the OCR fallback.
pub trait PageRasterizer {
    /// Rasterize one page (1-based) to an image.
    fn rasterize(&self, page: u32) -> Result<PageImage>;
}

/// Recognizes text in a page image, preserving line breaks.
pub trait TextRecognizer {
    /// Recognize text in an image; lines are newline-delimited.
    fn recognize(&self, image: &PageImage) -> Result<String>;
}

/// Configuration for the CLI-backed OCR implementations.
#[derive(Debug, Clone)]
pub struct OcrOptions {
    /// Path to the pdftoppm binary (default relies on PATH)
    pub pdftoppm_path: String,
    /// Path to the tesseract binary (default relies on PATH)
    pub tesseract_path: String,
    /// Recognition language passed to tesseract
    pub language: String,
    /// Rasterization resolution in DPI
    pub dpi: u32,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            pdftoppm_path: "pdftoppm".to_string(),
            tesseract_path: "tesseract".to_string(),
            language: "eng".to_string(),
            dpi: 150,
        }
    }
}

/// [`PageRasterizer`] backed by poppler's `pdftoppm`.
pub struct PdftoppmRasterizer {
    pdf_path: PathBuf,
    options: OcrOptions,
}

impl PdftoppmRasterizer {
    pub fn new<P: AsRef<Path>>(pdf_path: P, options: OcrOptions) -> Self {
        Self {
            pdf_path: pdf_path.as_ref().to_path_buf(),
            options,
        }
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&self, page: u32) -> Result<PageImage> {
        let dir = tempfile::tempdir()?;
        let prefix = dir.path().join("page");

        let output = Command::new(&self.options.pdftoppm_path)
            .arg("-png")
            .arg("-singlefile")
            .arg("-r")
            .arg(self.options.dpi.to_string())
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg(&self.pdf_path)
            .arg(&prefix)
            .output()
            .map_err(|e| {
                Error::Rasterize(format!(
                    "failed to run pdftoppm (is it installed? path='{}'): {}",
                    self.options.pdftoppm_path, e
                ))
            })?;

        if !output.status.success() {
            return Err(Error::Rasterize(format!(
                "pdftoppm exited with {} on page {}: {}",
                output.status,
                page,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let png_path = prefix.with_extension("png");
        let png = std::fs::read(&png_path).map_err(|e| {
            Error::Rasterize(format!("pdftoppm produced no image for page {}: {}", page, e))
        })?;
        Ok(PageImage { png })
    }
}

/// [`TextRecognizer`] backed by the `tesseract` CLI.
pub struct TesseractRecognizer {
    options: OcrOptions,
}

impl TesseractRecognizer {
    pub fn new(options: OcrOptions) -> Self {
        Self { options }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &PageImage) -> Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("unsheet-ocr-")
            .suffix(".png")
            .tempfile()?;
        file.write_all(&image.png)?;
        file.flush()?;

        // tesseract input.png stdout -l <lang>
        let output = Command::new(&self.options.tesseract_path)
            .arg(file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.options.language)
            .output()
            .map_err(|e| {
                Error::Ocr(format!(
                    "failed to run tesseract (is it installed? path='{}'): {}",
                    self.options.tesseract_path, e
                ))
            })?;

        if !output.status.success() {
            return Err(Error::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Check whether a binary can be invoked, for callers that want to probe
/// the OCR fallback before relying on it.
pub fn is_binary_available(path: &str) -> bool {
    Command::new(path)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = OcrOptions::default();
        assert_eq!(options.tesseract_path, "tesseract");
        assert_eq!(options.language, "eng");
        assert_eq!(options.dpi, 150);
    }

    #[test]
    fn test_missing_binary_fails_gracefully() {
        let options = OcrOptions {
            tesseract_path: "definitely-not-a-binary".to_string(),
            ..OcrOptions::default()
        };
        let recognizer = TesseractRecognizer::new(options);
        let image = PageImage { png: vec![0u8; 8] };
        assert!(matches!(recognizer.recognize(&image), Err(Error::Ocr(_))));
    }

    #[test]
    fn test_is_binary_available_for_missing_binary() {
        assert!(!is_binary_available("definitely-not-a-binary"));
    }
}
