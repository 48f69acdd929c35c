//! Error types for the pdf2csv library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2CsvError`] — **Fatal**: the extraction cannot proceed at all
//!   (missing input file, failed download, corrupt document, unwritable
//!   output). Returned as `Err(Pdf2CsvError)` from the top-level `extract*`
//!   functions.
//!
//! * [`PageError`] — **Non-fatal**: the detection engine failed on a single
//!   page. What happens next depends on the configured
//!   [`PageErrorPolicy`](crate::config::PageErrorPolicy): `Abort` promotes the
//!   first page failure to a fatal [`Pdf2CsvError::ExtractionFailed`], `Skip`
//!   records it in the run stats and continues with the remaining pages.
//!
//! A run that finds zero tables is NOT an error. It is reported through
//! [`CsvOutcome::NoTables`](crate::output::CsvOutcome) so callers can
//! distinguish "nothing to write" from an empty-but-written file.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2csv library.
///
/// Page-level failures use [`PageError`] and are only promoted here when the
/// abort-on-page-error policy is in effect.
#[derive(Debug, Error)]
pub enum Pdf2CsvError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path. Checked before any
    /// document open is attempted.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but the fetch failed (connection
    /// error, non-2xx status, truncated body).
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The detection engine could not open or parse the document.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// A password was supplied but the detection engine cannot decrypt
    /// documents.
    #[error("Password-protected PDFs are not supported by the table detection engine")]
    PasswordUnsupported,

    /// The configured page selection matches no page of the document.
    #[error("Page selection matches no pages (document has {total} pages)")]
    PageOutOfRange { total: usize },

    /// Table detection failed on a page and the abort policy is in effect.
    #[error("Table detection failed on page {page}: {detail}")]
    ExtractionFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output CSV file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Produced by the [`TableDetector`](crate::pipeline::detect::TableDetector)
/// when one page cannot be loaded or scanned. The run continues or halts
/// according to the configured policy.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The engine could not load the page at all.
    #[error("Page {page}: failed to load: {detail}")]
    LoadFailed { page: usize, detail: String },

    /// The engine raised while detecting tables on the page.
    #[error("Page {page}: table detection failed: {detail}")]
    DetectionFailed { page: usize, detail: String },
}

impl PageError {
    /// 1-based page number the error refers to.
    pub fn page(&self) -> usize {
        match self {
            PageError::LoadFailed { page, .. } | PageError::DetectionFailed { page, .. } => *page,
        }
    }

    /// Human-readable failure detail without the page prefix.
    pub fn detail(&self) -> &str {
        match self {
            PageError::LoadFailed { detail, .. } | PageError::DetectionFailed { detail, .. } => {
                detail
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display_names_path() {
        let e = Pdf2CsvError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert!(e.to_string().contains("/tmp/missing.pdf"));
    }

    #[test]
    fn download_timeout_display() {
        let e = Pdf2CsvError::DownloadTimeout {
            url: "https://example.org/doc.pdf".into(),
            secs: 120,
        };
        let msg = e.to_string();
        assert!(msg.contains("120s"), "got: {msg}");
        assert!(msg.contains("example.org"));
    }

    #[test]
    fn extraction_failed_display_names_page() {
        let e = Pdf2CsvError::ExtractionFailed {
            page: 3,
            detail: "broken content stream".into(),
        };
        assert!(e.to_string().contains("page 3"));
    }

    #[test]
    fn page_error_reports_page_number() {
        let e = PageError::DetectionFailed {
            page: 7,
            detail: "boom".into(),
        };
        assert_eq!(e.page(), 7);
        assert_eq!(e.detail(), "boom");
    }
}
