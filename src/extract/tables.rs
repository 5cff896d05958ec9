//! Table structuring: header detection over raw grids, with an OCR-based
//! fallback when the vector layout yields nothing.

use rayon::prelude::*;
use regex::Regex;

use crate::model::{RawTableGrid, StructuredTable, TableRecord};
use crate::ocr::{PageRasterizer, TextRecognizer};
use crate::pdf::PdfSource;

/// Derive a structured table from one raw grid.
///
/// Grids with two rows or fewer are ignored. The first row where every
/// cell is present is the header; detection halts there, so later
/// candidate header rows are never considered. Body rows become records
/// only when their length exactly matches the header's; mismatched rows
/// are dropped, not padded or truncated. Returns `None` when no header is
/// found or no body row survives.
pub fn structure_grid(grid: &RawTableGrid) -> Option<StructuredTable> {
    if grid.row_count() <= 2 {
        return None;
    }

    let header_idx = grid
        .rows
        .iter()
        .position(|row| row.iter().all(|cell| cell_present(cell)))?;
    let header: Vec<String> = grid.rows[header_idx]
        .iter()
        .map(|cell| cell.as_deref().unwrap_or("").trim().to_string())
        .collect();
    if header.is_empty() {
        return None;
    }

    let mut table = StructuredTable::new();
    for row in &grid.rows[header_idx + 1..] {
        if row.len() != header.len() {
            log::debug!(
                "dropping body row with {} cells against {} header cells",
                row.len(),
                header.len()
            );
            continue;
        }
        let mut record = TableRecord::new();
        for (key, cell) in header.iter().zip(row) {
            record.insert(
                key.clone(),
                cell.as_deref().unwrap_or("").trim().to_string(),
            );
        }
        table.push(record);
    }

    if table.is_empty() {
        None
    } else {
        Some(table)
    }
}

fn cell_present(cell: &Option<String>) -> bool {
    cell.as_deref().map(|c| !c.trim().is_empty()).unwrap_or(false)
}

/// Extract structured tables from the vector layout of every page,
/// preserving page and in-page grid order.
pub fn extract_tables<S: PdfSource + ?Sized>(source: &S) -> Vec<StructuredTable> {
    let mut tables = Vec::new();
    for page in 1..=source.page_count() {
        let grids = match source.page_grids(page) {
            Ok(grids) => grids,
            Err(e) => {
                log::warn!("table extraction failed on page {}: {}", page, e);
                continue;
            }
        };
        for grid in &grids {
            if let Some(table) = structure_grid(grid) {
                tables.push(table);
            }
        }
    }
    tables
}

/// Recover pseudo-tabular rows from OCR text when vector extraction found
/// nothing.
///
/// Every page is rasterized and recognized; each recognized line splits on
/// runs of two or more whitespace characters (or a literal tab), and lines
/// with fewer than two cells are discarded as non-tabular noise. Retained
/// rows get synthetic `col_1, col_2, …` names and all pages flatten into a
/// single table — OCR gives no reliable grid boundaries, so page structure
/// is deliberately not preserved.
pub fn ocr_tables<R, T>(
    page_count: u32,
    rasterizer: &R,
    recognizer: &T,
    parallel: bool,
) -> Vec<StructuredTable>
where
    R: PageRasterizer + Sync + ?Sized,
    T: TextRecognizer + Sync + ?Sized,
{
    let recognize_page = |page: u32| -> Vec<String> {
        let text = rasterizer
            .rasterize(page)
            .and_then(|image| recognizer.recognize(&image));
        match text {
            Ok(text) => text
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect(),
            Err(e) => {
                log::warn!("OCR fallback failed on page {}: {}", page, e);
                Vec::new()
            }
        }
    };

    // Pages are independent; output ordering matches page order either way.
    let page_lines: Vec<Vec<String>> = if parallel {
        (1..=page_count).into_par_iter().map(recognize_page).collect()
    } else {
        (1..=page_count).map(recognize_page).collect()
    };

    let cell_split = Regex::new(r"\s{2,}|\t").unwrap();
    let mut table = StructuredTable::new();
    for line in page_lines.iter().flatten() {
        let cells: Vec<&str> = cell_split.split(line).collect();
        if cells.len() < 2 {
            continue;
        }
        let mut record = TableRecord::new();
        for (i, cell) in cells.iter().enumerate() {
            record.insert(format!("col_{}", i + 1), cell.trim().to_string());
        }
        table.push(record);
    }

    if table.is_empty() {
        vec![]
    } else {
        vec![table]
    }
}
