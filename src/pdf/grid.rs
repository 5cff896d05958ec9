//! Raw table grid detection from text positions.
//!
//! Detects grid-like regions by text alignment patterns (Stream-mode style)
//! rather than ruling lines: spans are grouped into rows by Y position,
//! column edges are voted from left-edge alignment across rows, and
//! contiguous well-aligned row runs become [`RawTableGrid`]s. Cells with no
//! span in a column slot are emitted as absent, and no attempt is made to
//! square up ragged regions.

use std::collections::{HashMap, HashSet};

use crate::model::RawTableGrid;

use super::span::TextSpan;

/// A row of spans grouped by Y position.
#[derive(Debug, Clone)]
struct SpanRow {
    spans: Vec<TextSpan>,
}

/// Grid detector configuration.
#[derive(Debug, Clone)]
pub struct GridDetectorConfig {
    /// Minimum number of rows to consider a region
    pub min_rows: usize,
    /// Minimum number of columns to consider a region
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for GridDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 8,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Detects raw table grids in a list of text spans.
pub struct GridDetector {
    config: GridDetectorConfig,
}

impl GridDetector {
    /// Create a detector with default configuration.
    pub fn new() -> Self {
        Self {
            config: GridDetectorConfig::default(),
        }
    }

    /// Create a detector with custom configuration.
    pub fn with_config(config: GridDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect grids in the given spans, top-to-bottom page order.
    pub fn detect(&self, spans: Vec<TextSpan>) -> Vec<RawTableGrid> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            log::debug!("GridDetector: not enough spans ({})", spans.len());
            return vec![];
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < self.config.min_rows {
            log::debug!("GridDetector: not enough rows ({})", rows.len());
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        if columns.len() < self.config.min_columns {
            log::debug!("GridDetector: not enough columns ({})", columns.len());
            return vec![];
        }

        let regions = self.find_regions(&rows, &columns);
        log::debug!("GridDetector: found {} candidate regions", regions.len());

        let mut grids = Vec::new();
        for (start, end) in regions {
            let region_rows = &rows[start..=end];

            // Re-detect columns for this specific region
            let region_columns = self.detect_columns(region_rows);
            if region_columns.len() < self.config.min_columns {
                continue;
            }
            if region_columns.len() > self.config.max_columns {
                log::debug!(
                    "GridDetector: skipping region with {} columns",
                    region_columns.len()
                );
                continue;
            }
            if self.is_bullet_region(region_rows) {
                log::debug!("GridDetector: skipping bullet-list region");
                continue;
            }

            grids.push(self.build_grid(region_rows, &region_columns));
        }

        grids
    }

    /// Group spans into rows by Y position.
    fn group_into_rows(&self, mut spans: Vec<TextSpan>) -> Vec<SpanRow> {
        if spans.is_empty() {
            return vec![];
        }

        // Sort by Y (descending for PDF coords) then X
        spans.sort_by(|a, b| {
            let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });

        let mut rows: Vec<SpanRow> = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in spans {
            let y_tolerance = span.font_size * self.config.y_tolerance_factor;
            match current_y {
                Some(y) if (span.y - y).abs() <= y_tolerance => {
                    current.push(span);
                }
                _ => {
                    if !current.is_empty() {
                        rows.push(SpanRow {
                            spans: std::mem::take(&mut current),
                        });
                    }
                    current_y = Some(span.y);
                    current.push(span);
                }
            }
        }
        if !current.is_empty() {
            rows.push(SpanRow { spans: current });
        }

        rows
    }

    /// Detect column boundaries by voting on left-edge alignment.
    fn detect_columns(&self, rows: &[SpanRow]) -> Vec<f32> {
        if rows.is_empty() {
            return vec![];
        }

        let multi_span_rows: Vec<&SpanRow> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let voting_rows: &[&SpanRow] = if multi_span_rows.len() >= self.config.min_rows {
            &multi_span_rows
        } else {
            // Not enough multi-span rows; vote with everything.
            return self.collect_edges(rows.iter().collect::<Vec<_>>().as_slice(), rows.len());
        };

        self.collect_edges(voting_rows, multi_span_rows.len())
    }

    fn collect_edges(&self, rows: &[&SpanRow], row_count: usize) -> Vec<f32> {
        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        let bucket_size = 5.0; // group X positions within 5pt

        for row in rows {
            // Count each bucket only once per row
            let mut row_buckets: HashSet<i32> = HashSet::new();
            for span in &row.spans {
                row_buckets.insert((span.x / bucket_size).round() as i32);
            }
            for bucket in row_buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((row_count as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * bucket_size)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Merge edges closer than the minimum column gap
        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Find contiguous row runs that align with the column edges.
    fn find_regions(&self, rows: &[SpanRow], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;
        let mut run = 0;

        for (i, row) in rows.iter().enumerate() {
            if self.alignment_score(row, columns) >= self.config.min_alignment_ratio {
                if start.is_none() {
                    start = Some(i);
                }
                run += 1;
            } else {
                if let Some(s) = start {
                    if run >= self.config.min_rows {
                        regions.push((s, i - 1));
                    }
                }
                start = None;
                run = 0;
            }
        }
        if let Some(s) = start {
            if run >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }

        regions
    }

    /// Fraction of a row's spans that sit on a column edge.
    fn alignment_score(&self, row: &SpanRow, columns: &[f32]) -> f32 {
        if row.spans.is_empty() || columns.is_empty() {
            return 0.0;
        }
        let tolerance = 5.0;
        let aligned = row
            .spans
            .iter()
            .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= tolerance))
            .count();
        aligned as f32 / row.spans.len() as f32
    }

    /// Rows that lead with bullet glyphs are list items, not table rows.
    fn is_bullet_region(&self, rows: &[SpanRow]) -> bool {
        if rows.is_empty() {
            return false;
        }
        let bullet_rows = rows
            .iter()
            .filter_map(|row| {
                row.spans
                    .iter()
                    .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
            })
            .filter(|span| is_bullet_marker(span.text.trim()))
            .count();
        bullet_rows as f32 / rows.len() as f32 >= 0.5
    }

    /// Build a grid: one cell slot per column, absent when no span lands in it.
    fn build_grid(&self, rows: &[SpanRow], columns: &[f32]) -> RawTableGrid {
        let right_edge = rows
            .iter()
            .flat_map(|r| r.spans.iter())
            .map(|s| s.x)
            .fold(f32::MIN, f32::max);

        let mut grid = RawTableGrid::new();
        for row in rows {
            let mut cells: Vec<Vec<String>> = vec![Vec::new(); columns.len()];
            for span in &row.spans {
                let idx = column_for_span(span.x, columns, right_edge);
                if idx < cells.len() {
                    cells[idx].push(span.text.trim().to_string());
                }
            }
            grid.push_row(
                cells
                    .into_iter()
                    .map(|parts| {
                        if parts.is_empty() {
                            None
                        } else {
                            Some(parts.join(" "))
                        }
                    })
                    .collect(),
            );
        }
        grid
    }
}

impl Default for GridDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Find which column a span belongs to based on its X position.
fn column_for_span(span_x: f32, columns: &[f32], right_edge: f32) -> usize {
    for (i, &col_start) in columns.iter().enumerate() {
        let col_end = columns.get(i + 1).copied().unwrap_or(right_edge + 100.0);
        if span_x >= col_start - 10.0 && span_x < col_end - 10.0 {
            return i;
        }
    }

    // No slot matched; take the closest edge
    let mut min_dist = f32::MAX;
    let mut closest = 0;
    for (i, &col_start) in columns.iter().enumerate() {
        let dist = (span_x - col_start).abs();
        if dist < min_dist {
            min_dist = dist;
            closest = i;
        }
    }
    closest
}

/// Check if text is a bullet marker.
fn is_bullet_marker(text: &str) -> bool {
    matches!(text, "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "►" | "●")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, 12.0)
    }

    #[test]
    fn test_detect_simple_grid() {
        let detector = GridDetector::new();
        let spans = vec![
            make_span("Name", 10.0, 100.0),
            make_span("Age", 60.0, 100.0),
            make_span("Alice", 10.0, 85.0),
            make_span("30", 60.0, 85.0),
            make_span("Bob", 10.0, 70.0),
            make_span("25", 60.0, 70.0),
        ];

        let grids = detector.detect(spans);
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].row_count(), 3);
        assert_eq!(
            grids[0].rows[0],
            vec![Some("Name".to_string()), Some("Age".to_string())]
        );
    }

    #[test]
    fn test_missing_cell_is_absent() {
        let detector = GridDetector::new();
        let spans = vec![
            make_span("Col1", 10.0, 100.0),
            make_span("Col2", 60.0, 100.0),
            make_span("a", 10.0, 85.0),
            make_span("b", 60.0, 85.0),
            make_span("c", 10.0, 70.0),
            // second cell of the last row missing
        ];

        let grids = detector.detect(spans);
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].rows[2], vec![Some("c".to_string()), None]);
    }

    #[test]
    fn test_single_column_is_not_a_grid() {
        let detector = GridDetector::new();
        let spans = vec![
            make_span("Line 1", 10.0, 100.0),
            make_span("Line 2", 10.0, 85.0),
            make_span("Line 3", 10.0, 70.0),
            make_span("Line 4", 10.0, 55.0),
        ];

        assert!(detector.detect(spans).is_empty());
    }

    #[test]
    fn test_bullet_list_rejected() {
        let detector = GridDetector::new();
        let spans = vec![
            make_span("•", 50.0, 400.0),
            make_span("Management", 80.0, 400.0),
            make_span("•", 50.0, 370.0),
            make_span("Interfaces", 80.0, 370.0),
            make_span("•", 50.0, 340.0),
            make_span("Firmware", 80.0, 340.0),
        ];

        assert!(detector.detect(spans).is_empty());
    }

    #[test]
    fn test_column_for_span() {
        let columns = vec![10.0, 60.0];
        assert_eq!(column_for_span(10.0, &columns, 120.0), 0);
        assert_eq!(column_for_span(62.0, &columns, 120.0), 1);
        assert_eq!(column_for_span(300.0, &columns, 120.0), 1);
    }
}
