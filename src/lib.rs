//! # pdf2csv
//!
//! Extract tabular data from PDF documents (local files or URLs) to CSV.
//!
//! ## What this crate does — and does not — do
//!
//! Table detection itself (ruling-line analysis, text clustering, cell
//! grouping) is delegated entirely to the external `pdfplumber` engine,
//! consumed as a black box behind a narrow
//! [`TableDetector`](pipeline::detect::TableDetector) seam. This crate is
//! the orchestration around it: resolve the input, walk a configured page
//! range in order, flatten each detected row with 1-based page/table index
//! prefixes, normalise cell text, and serialise everything to one CSV file.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      resolve local file or download from URL (with timeout)
//!  ├─ 2. Detect     per-page table detection via the engine (spawn_blocking)
//!  ├─ 3. Normalize  strip category-C chars (keep \t \n \r), compose to NFC
//!  └─ 4. Write      Page,Table,Column1..N header + rows; no file when empty
//! ```
//!
//! Processing is strictly sequential: pages ascend in index order, tables
//! keep the engine's order, and a mid-run failure discards all rows rather
//! than flushing a partial CSV.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2csv::{extract_to_csv, CsvOutcome, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let (stats, outcome) = extract_to_csv("document.pdf", None, &config).await?;
//!     match outcome {
//!         CsvOutcome::Written(path) => {
//!             println!("{} rows → {}", stats.rows_extracted, path.display());
//!         }
//!         CsvOutcome::NoTables => println!("No tables found"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2csv` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2csv = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    default_output_path, DetectionStrategy, ExtractionConfig, ExtractionConfigBuilder,
    PageErrorPolicy, PageSelection, StrategySettings,
};
pub use error::{PageError, Pdf2CsvError};
pub use extract::{extract, extract_sync, extract_to_csv, extract_with_detector, inspect};
pub use output::{CsvOutcome, DocumentInfo, ExtractionOutput, ExtractionStats, OutputRow};
pub use pipeline::detect::{DetectedTable, TableDetector};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
