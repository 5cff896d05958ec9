//! Table types: raw cell grids and header-keyed record tables.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One structured-table record: column name → cell value, in header order.
pub type TableRecord = IndexMap<String, String>;

/// A raw cell grid recovered from a page before header detection.
///
/// Rows are not guaranteed to be the same length, and cells may be absent.
/// Whitespace-only cells are normalized to `None` at construction time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTableGrid {
    /// Rows of optional cell values
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTableGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from rows of cell strings, normalizing blank cells to `None`.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = Option<String>>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.filter(|c| !c.trim().is_empty()))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Add a row to the grid, normalizing blank cells to `None`.
    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(
            row.into_iter()
                .map(|cell| cell.filter(|c| !c.trim().is_empty()))
                .collect(),
        );
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A header-keyed record sequence derived from a [`RawTableGrid`] or OCR text.
///
/// Serializes as a bare array of records, matching the output record shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredTable {
    /// Records in body-row order
    pub records: Vec<TableRecord>,
}

impl StructuredTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Check if the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a record.
    pub fn push(&mut self, record: TableRecord) {
        self.records.push(record);
    }
}
