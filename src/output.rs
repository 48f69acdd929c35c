//! Output types: flattened rows, run statistics, and document info.
//!
//! Everything here derives `Serialize` so the CLI's `--json` mode can emit
//! machine-readable results without a separate reporting layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One flattened table row: 1-based page and table indices followed by the
/// source row's cells.
///
/// Cell count mirrors the source row and is NOT uniform across rows; a `None`
/// cell is an empty field in the CSV. Indices are always positive and follow
/// iteration order (pages ascending, tables in engine order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    /// 1-based page number the row came from.
    pub page: usize,
    /// 1-based table index within that page.
    pub table: usize,
    /// Cell values in source order; `None` for empty cells.
    pub cells: Vec<Option<String>>,
}

impl OutputRow {
    /// Flatten into CSV fields: page, table, then cells (`None` → empty).
    pub fn to_record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(2 + self.cells.len());
        record.push(self.page.to_string());
        record.push(self.table.to_string());
        record.extend(
            self.cells
                .iter()
                .map(|c| c.clone().unwrap_or_default()),
        );
        record
    }
}

/// Statistics for one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages scanned without error.
    pub processed_pages: usize,
    /// Pages where detection failed (skip policy only; abort never gets here).
    pub failed_pages: usize,
    /// Tables detected across all processed pages.
    pub tables_found: usize,
    /// Output rows collected.
    pub rows_extracted: usize,
    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
    /// Time spent scanning pages and collecting rows, in milliseconds.
    pub detect_duration_ms: u64,
}

/// The result of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// All flattened rows, in encounter order.
    pub rows: Vec<OutputRow>,
    /// Run statistics.
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// Whether the run found any tables at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Basic document information returned by [`crate::inspect`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// The resolved source (local path, possibly a downloaded temp file).
    pub source: PathBuf,
    /// Number of pages in the document.
    pub page_count: usize,
}

/// Outcome of writing an extraction result to CSV.
///
/// An empty CSV file would be indistinguishable from a successful-but-empty
/// result, so the writer refuses to create one; the distinction is carried
/// here instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CsvOutcome {
    /// Rows were written to the given path.
    Written(PathBuf),
    /// No tables were found; no file was created.
    NoTables,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_flattens_indices_then_cells() {
        let row = OutputRow {
            page: 2,
            table: 1,
            cells: vec![Some("a".into()), None, Some("c".into())],
        };
        assert_eq!(row.to_record(), vec!["2", "1", "a", "", "c"]);
    }

    #[test]
    fn record_with_no_cells_is_just_indices() {
        let row = OutputRow {
            page: 1,
            table: 1,
            cells: vec![],
        };
        assert_eq!(row.to_record(), vec!["1", "1"]);
    }

    #[test]
    fn empty_output_reports_empty() {
        let out = ExtractionOutput {
            rows: vec![],
            stats: ExtractionStats::default(),
        };
        assert!(out.is_empty());
    }
}
