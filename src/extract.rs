//! Extraction entry points.
//!
//! The pipeline is fully sequential: one document handle, pages visited in
//! index order, tables in engine order, rows accumulated in memory and
//! written once at the end. The synchronous core
//! ([`extract_with_detector`]) is separated from the async shell so tests can
//! drive it with a fake [`TableDetector`] and no real PDF.
//!
//! The state machine is `Opened → per-page detect/collect → Closed →
//! Written | NoTables`, run exactly once per invocation — no resumption, no
//! partial output: a failure mid-run discards the rows collected so far.

use crate::config::{default_output_path, ExtractionConfig, PageErrorPolicy};
use crate::error::Pdf2CsvError;
use crate::output::{CsvOutcome, DocumentInfo, ExtractionOutput, ExtractionStats, OutputRow};
use crate::pipeline::detect::{PdfplumberDetector, TableDetector};
use crate::pipeline::{input, normalize, writer};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract tables from a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config`    — Extraction configuration
///
/// # Returns
/// `Ok(ExtractionOutput)` with the flattened rows (possibly none — a PDF
/// without tables is not an error) and run statistics.
///
/// # Errors
/// * File not found / permission denied / not a PDF
/// * Download failure or timeout for URL inputs
/// * Document open failure
/// * Page detection failure, when the abort policy is in effect
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2CsvError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();

    // ── Step 2: Open + detect inside spawn_blocking ──────────────────────
    // The engine is synchronous and CPU-bound; running it on the blocking
    // pool keeps the async runtime responsive. The document handle lives
    // entirely inside the closure, so it is released on every exit path.
    let task_config = config.clone();
    let mut output = tokio::task::spawn_blocking(move || {
        let detector = PdfplumberDetector::open(&pdf_path, task_config.password.as_deref())?;
        extract_with_detector(&detector, &task_config)
    })
    .await
    .map_err(|e| Pdf2CsvError::Internal(format!("Extraction task panicked: {}", e)))??;

    // `resolved` (and any downloaded temp dir) lives until here.
    drop(resolved);

    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Extraction complete: {} rows from {} tables in {}ms",
        output.stats.rows_extracted, output.stats.tables_found, output.stats.total_duration_ms
    );
    Ok(output)
}

/// Synchronous extraction core over an already-open detector.
///
/// Applies the page selection, drives per-page detection, enforces the
/// page-error policy, and flattens rows with 1-based page/table prefixes.
pub fn extract_with_detector(
    detector: &dyn TableDetector,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2CsvError> {
    let run_start = Instant::now();

    let total_pages = detector.page_count();
    let indices = config.pages.to_indices(total_pages);
    if indices.is_empty() {
        return Err(Pdf2CsvError::PageOutOfRange { total: total_pages });
    }
    debug!(
        "Processing {} of {} pages with {:?} policy",
        indices.len(),
        total_pages,
        config.page_error_policy
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_start(indices.len());
    }

    let mut rows: Vec<OutputRow> = Vec::new();
    let mut processed_pages = 0usize;
    let mut failed_pages = 0usize;
    let mut tables_found = 0usize;

    // Detection is driven page by page so progress events fire as pages
    // complete and the abort policy stops before scanning the rest of the
    // document.
    let detect_start = Instant::now();
    for &idx in &indices {
        let page_num = idx + 1;
        match detector.detect_page(idx, &config.strategy) {
            Ok(tables) => {
                let mut page_rows = 0usize;
                for (table_idx, table) in tables.iter().enumerate() {
                    for source_row in &table.rows {
                        let cells: Vec<Option<String>> = if config.normalize {
                            source_row
                                .iter()
                                .map(|c| normalize::normalize_opt(c.clone()))
                                .collect()
                        } else {
                            source_row.clone()
                        };
                        rows.push(OutputRow {
                            page: page_num,
                            table: table_idx + 1,
                            cells,
                        });
                        page_rows += 1;
                    }
                }
                tables_found += tables.len();
                processed_pages += 1;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page(page_num, indices.len(), tables.len(), page_rows);
                }
            }
            Err(page_err) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, indices.len(), &page_err.to_string());
                }
                match config.page_error_policy {
                    PageErrorPolicy::Abort => {
                        return Err(Pdf2CsvError::ExtractionFailed {
                            page: page_err.page(),
                            detail: page_err.detail().to_string(),
                        });
                    }
                    PageErrorPolicy::Skip => {
                        warn!("Skipping page {}: {}", page_num, page_err);
                        failed_pages += 1;
                    }
                }
            }
        }
    }
    let detect_duration_ms = detect_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_complete(processed_pages, rows.len());
    }

    let rows_extracted = rows.len();
    Ok(ExtractionOutput {
        rows,
        stats: ExtractionStats {
            total_pages,
            processed_pages,
            failed_pages,
            tables_found,
            rows_extracted,
            total_duration_ms: run_start.elapsed().as_millis() as u64,
            detect_duration_ms,
        },
    })
}

/// Extract tables and write them straight to a CSV file.
///
/// `output_path` defaults to `<stem>_extracted_tables[<range-suffix>].csv`
/// next to the input (for URL inputs, in the current directory, named from
/// the URL's last path segment). When no tables are found, no file is
/// created and [`CsvOutcome::NoTables`] is returned.
pub async fn extract_to_csv(
    input_str: impl AsRef<str>,
    output_path: Option<&Path>,
    config: &ExtractionConfig,
) -> Result<(ExtractionStats, CsvOutcome), Pdf2CsvError> {
    let input_str = input_str.as_ref();
    let output = extract(input_str, config).await?;

    let target: PathBuf = match output_path {
        Some(p) => p.to_path_buf(),
        None => {
            let source: PathBuf = if input::is_url(input_str) {
                PathBuf::from(input::filename_from_url(input_str))
            } else {
                PathBuf::from(input_str)
            };
            default_output_path(&source, &config.pages)
        }
    };

    let outcome = writer::write_csv(&output.rows, &target).await?;
    Ok((output.stats, outcome))
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2CsvError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2CsvError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input_str, config))
}

/// Report basic document information without extracting anything.
pub async fn inspect(input_str: impl AsRef<str>) -> Result<DocumentInfo, Pdf2CsvError> {
    let resolved = input::resolve_input(input_str.as_ref(), 120).await?;
    let pdf_path = resolved.path().to_path_buf();
    let report_path = pdf_path.clone();

    let page_count = tokio::task::spawn_blocking(move || {
        PdfplumberDetector::open(&pdf_path, None).map(|d| d.page_count())
    })
    .await
    .map_err(|e| Pdf2CsvError::Internal(format!("Inspect task panicked: {}", e)))??;

    Ok(DocumentInfo {
        source: report_path,
        page_count,
    })
}
