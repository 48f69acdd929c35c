//! CSV serialisation of flattened table rows.
//!
//! ## Empty-result policy
//!
//! A header-only CSV is indistinguishable from a successful-but-empty
//! extraction, so when no rows were collected nothing is written and
//! [`CsvOutcome::NoTables`] is returned; callers surface an explicit
//! "no tables found" notice instead.
//!
//! ## Header
//!
//! `Page,Table,Column1..ColumnN` where `N` is the widest row, floored at 5
//! (the historical header shape). Rows are written flexibly — never padded
//! or truncated — so consumers must not assume fixed arity.

use crate::error::Pdf2CsvError;
use crate::output::{CsvOutcome, OutputRow};
use std::path::Path;
use tracing::{debug, info};

/// Minimum number of `ColumnN` header fields, matching the historically
/// fixed 5-column header.
const MIN_HEADER_COLUMNS: usize = 5;

/// Build the header record for the given rows.
fn header_for(rows: &[OutputRow]) -> Vec<String> {
    let widest = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    let columns = widest.max(MIN_HEADER_COLUMNS);

    let mut header = Vec::with_capacity(2 + columns);
    header.push("Page".to_string());
    header.push("Table".to_string());
    header.extend((1..=columns).map(|i| format!("Column{i}")));
    header
}

/// Serialise rows to CSV bytes (UTF-8, `\n` terminators, standard quoting).
///
/// Returns `None` when there are no rows.
pub fn to_csv_bytes(rows: &[OutputRow]) -> Result<Option<Vec<u8>>, Pdf2CsvError> {
    if rows.is_empty() {
        return Ok(None);
    }

    // Flexible: data rows may be narrower or wider than the header.
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer
        .write_record(header_for(rows))
        .map_err(|e| Pdf2CsvError::Internal(format!("CSV encoding failed: {e}")))?;
    for row in rows {
        writer
            .write_record(row.to_record())
            .map_err(|e| Pdf2CsvError::Internal(format!("CSV encoding failed: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Pdf2CsvError::Internal(format!("CSV encoding failed: {e}")))?;
    Ok(Some(bytes))
}

/// Write rows to `path` as CSV, atomically (temp file + rename).
///
/// When `rows` is empty no file is created and [`CsvOutcome::NoTables`] is
/// returned.
pub async fn write_csv(rows: &[OutputRow], path: &Path) -> Result<CsvOutcome, Pdf2CsvError> {
    let Some(bytes) = to_csv_bytes(rows)? else {
        info!("No tables found; not writing {}", path.display());
        return Ok(CsvOutcome::NoTables);
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Pdf2CsvError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    // Atomic write: write to temp, then rename
    let tmp_path = path.with_extension("csv.tmp");
    tokio::fs::write(&tmp_path, &bytes)
        .await
        .map_err(|e| Pdf2CsvError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Pdf2CsvError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(CsvOutcome::Written(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(page: usize, table: usize, cells: &[&str]) -> OutputRow {
        OutputRow {
            page,
            table,
            cells: cells.iter().map(|c| Some(c.to_string())).collect(),
        }
    }

    #[test]
    fn empty_rows_produce_no_bytes() {
        assert_eq!(to_csv_bytes(&[]).unwrap(), None);
    }

    #[test]
    fn header_floors_at_five_columns() {
        let rows = [row(1, 1, &["a", "b"])];
        let bytes = to_csv_bytes(&rows).unwrap().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("Page,Table,Column1,Column2,Column3,Column4,Column5\n"));
    }

    #[test]
    fn header_grows_with_widest_row() {
        let rows = [
            row(1, 1, &["a", "b", "c", "d", "e", "f", "g"]),
            row(1, 1, &["a"]),
        ];
        let bytes = to_csv_bytes(&rows).unwrap().unwrap();
        let header = String::from_utf8(bytes)
            .unwrap()
            .lines()
            .next()
            .unwrap()
            .to_string();
        assert!(header.ends_with("Column7"));
    }

    #[test]
    fn rows_keep_their_own_arity() {
        let rows = [row(2, 1, &["x", "y"]), row(2, 1, &["only"])];
        let bytes = to_csv_bytes(&rows).unwrap().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 rows
        assert_eq!(lines[1], "2,1,x,y");
        assert_eq!(lines[2], "2,1,only");
    }

    #[test]
    fn cells_with_commas_are_quoted() {
        let rows = [row(1, 1, &["a,b", "plain"])];
        let bytes = to_csv_bytes(&rows).unwrap().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"a,b\",plain"));
    }

    #[test]
    fn none_cells_are_empty_fields() {
        let rows = [OutputRow {
            page: 1,
            table: 1,
            cells: vec![Some("a".into()), None, Some("c".into())],
        }];
        let bytes = to_csv_bytes(&rows).unwrap().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("1,1,a,,c"));
    }

    #[tokio::test]
    async fn write_csv_skips_file_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let outcome = write_csv(&[], &path).await.unwrap();
        assert_eq!(outcome, CsvOutcome::NoTables);
        assert!(!path.exists(), "no file must be created for empty results");
    }

    #[tokio::test]
    async fn write_csv_writes_and_renames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let rows = [row(1, 1, &["a", "b", "c", "d", "e"])];
        let outcome = write_csv(&rows, &path).await.unwrap();
        assert_eq!(outcome, CsvOutcome::Written(path.clone()));

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(!path.with_extension("csv.tmp").exists());
    }
}
