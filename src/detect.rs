//! PDF format detection and validation.
//!
//! An unreadable input is the one fatal condition in the pipeline, so the
//! magic-byte check runs before any decoding is attempted.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Check that the file at `path` starts with a PDF header.
///
/// Returns the version string (e.g. `"1.7"`) on success, or
/// [`Error::DocumentUnreadable`] for anything that is not a PDF.
pub fn detect_pdf_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path.as_ref())
        .map_err(|e| Error::DocumentUnreadable(format!("{}: {}", path.as_ref().display(), e)))?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 16];
    let n = reader
        .read(&mut header)
        .map_err(|e| Error::DocumentUnreadable(e.to_string()))?;
    detect_pdf_from_bytes(&header[..n])
}

/// Check that `data` starts with a PDF header.
pub fn detect_pdf_from_bytes(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
        return Err(Error::DocumentUnreadable("file too short".to_string()));
    }

    if &data[..PDF_MAGIC_LEN] != PDF_MAGIC {
        return Err(Error::DocumentUnreadable(
            "missing %PDF header".to_string(),
        ));
    }

    let version = String::from_utf8_lossy(&data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN]);
    Ok(version.to_string())
}

/// Check if bytes look like a PDF without extracting the version.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_pdf_from_bytes(data).is_ok()
}
