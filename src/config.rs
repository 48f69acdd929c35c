//! Configuration types for PDF table extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across calls, log them, and diff two runs to
//! understand why their outputs differ.

use crate::error::Pdf2CsvError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration for one extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2csv::{ExtractionConfig, PageSelection, PageErrorPolicy};
///
/// let config = ExtractionConfig::builder()
///     .pages(PageSelection::Range(1, 5))
///     .page_error_policy(PageErrorPolicy::Skip)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// Detection strategy forwarded to the table engine. Default: ruling
    /// lines on both axes.
    pub strategy: StrategySettings,

    /// Normalise cell text (strip Unicode category-C characters except
    /// tab/newline/CR, then NFC). Default: true.
    ///
    /// PDF text extraction sometimes emits accented Latin letters in
    /// decomposed form interleaved with stray control bytes; normalisation
    /// makes those cells render correctly in downstream tools.
    pub normalize: bool,

    /// What to do when the engine fails on a single page. Default: abort.
    pub page_error_policy: PageErrorPolicy,

    /// PDF user password for encrypted documents.
    ///
    /// The current detection engine cannot decrypt; setting this fails the
    /// run with [`Pdf2CsvError::PasswordUnsupported`] at open time.
    pub password: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    ///
    /// Without this a hanging fetch would hang the whole run; expiry surfaces
    /// as [`Pdf2CsvError::DownloadTimeout`].
    pub download_timeout_secs: u64,

    /// Optional per-page progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pages: PageSelection::default(),
            strategy: StrategySettings::default(),
            normalize: true,
            page_error_policy: PageErrorPolicy::default(),
            password: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("pages", &self.pages)
            .field("strategy", &self.strategy)
            .field("normalize", &self.normalize)
            .field("page_error_policy", &self.page_error_policy)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn strategy(mut self, strategy: StrategySettings) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn normalize(mut self, v: bool) -> Self {
        self.config.normalize = v;
        self
    }

    pub fn page_error_policy(mut self, policy: PageErrorPolicy) -> Self {
        self.config.page_error_policy = policy;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Pdf2CsvError> {
        let c = &self.config;
        if c.download_timeout_secs == 0 {
            return Err(Pdf2CsvError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        if let PageSelection::Range(start, end) = c.pages {
            if start < 1 || start > end {
                return Err(Pdf2CsvError::InvalidConfig(format!(
                    "Invalid page range {start}-{end}: pages are 1-indexed and start must be ≤ end"
                )));
            }
        }
        if c.strategy.wants_explicit() && c.strategy.explicit_lines.is_none() {
            return Err(Pdf2CsvError::InvalidConfig(
                "Explicit strategy requires explicit line coordinates".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to process (1-indexed in the public API).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Process all pages (default).
    #[default]
    All,
    /// Process a single page.
    Single(usize),
    /// Process a contiguous range of pages (inclusive).
    Range(usize, usize),
    /// Process specific pages (deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed
    /// page numbers, clipped to the document length.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Suffix appended to the default output filename for non-default
    /// selections, so restricted runs never overwrite a full-document export.
    pub fn file_suffix(&self) -> String {
        match self {
            PageSelection::All => String::new(),
            PageSelection::Single(p) => format!("_page_{p}"),
            PageSelection::Range(a, b) => format!("_pages_{a}-{b}"),
            PageSelection::Set(_) => "_pages_custom".to_string(),
        }
    }
}

/// Axis strategy handed to the external table-detection engine.
///
/// Semantics are owned entirely by the engine; this crate only forwards the
/// choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetectionStrategy {
    /// Detect cell boundaries from ruling lines drawn on the page (default).
    #[default]
    Lines,
    /// Detect boundaries from text alignment patterns.
    Text,
    /// Use caller-supplied line coordinates.
    Explicit,
}

/// Per-axis strategy configuration plus optional explicit line coordinates.
///
/// The underlying Rust engine exposes one combined strategy knob rather than
/// independent axes, so the pair is collapsed when forwarded: both axes
/// `Text` selects text-alignment detection, either axis `Explicit` selects
/// explicit mode, everything else falls back to ruling-line detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategySettings {
    /// Strategy for vertical (column) boundaries.
    pub vertical: DetectionStrategy,
    /// Strategy for horizontal (row) boundaries.
    pub horizontal: DetectionStrategy,
    /// Explicit boundary coordinates `(horizontal_lines, vertical_lines)`,
    /// required when either axis is [`DetectionStrategy::Explicit`].
    pub explicit_lines: Option<(Vec<f64>, Vec<f64>)>,
}

impl StrategySettings {
    /// Whether either axis requests the explicit strategy.
    pub fn wants_explicit(&self) -> bool {
        self.vertical == DetectionStrategy::Explicit
            || self.horizontal == DetectionStrategy::Explicit
    }
}

/// What the pipeline does when table detection fails on one page.
///
/// The original tool propagated the first failure and halted; that stays the
/// default. `Skip` trades completeness of the error for completeness of the
/// data: the failed page is logged, counted in the stats, and the remaining
/// pages are still processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageErrorPolicy {
    /// Halt the run on the first page failure (default).
    #[default]
    Abort,
    /// Log the failure, record it in the stats, and continue.
    Skip,
}

// ── Output path derivation ───────────────────────────────────────────────

/// Derive the default CSV output path from the source file.
///
/// `<stem>_extracted_tables[<range-suffix>].csv`, placed next to the input.
/// The range suffix (see [`PageSelection::file_suffix`]) is only present for
/// restricted selections.
pub fn default_output_path(pdf_path: &Path, pages: &PageSelection) -> PathBuf {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = format!("{stem}_extracted_tables{}.csv", pages.file_suffix());
    pdf_path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }

    #[test]
    fn range_clipped_to_document_length() {
        // First 5 pages of a 10-page document
        assert_eq!(PageSelection::Range(1, 5).to_indices(10), vec![0, 1, 2, 3, 4]);
        // Range extending past the end is clipped
        assert_eq!(PageSelection::Range(3, 10).to_indices(4), vec![2, 3]);
    }

    #[test]
    fn default_output_path_plain() {
        let p = default_output_path(Path::new("/data/report.pdf"), &PageSelection::All);
        assert_eq!(p, PathBuf::from("/data/report_extracted_tables.csv"));
    }

    #[test]
    fn default_output_path_with_range_suffix() {
        let p = default_output_path(Path::new("report.pdf"), &PageSelection::Range(1, 5));
        assert_eq!(p, PathBuf::from("report_extracted_tables_pages_1-5.csv"));

        let p = default_output_path(Path::new("report.pdf"), &PageSelection::Single(2));
        assert_eq!(p, PathBuf::from("report_extracted_tables_page_2.csv"));
    }

    #[test]
    fn builder_rejects_zero_timeout() {
        let err = ExtractionConfig::builder()
            .download_timeout_secs(0)
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn builder_rejects_inverted_range() {
        let err = ExtractionConfig::builder()
            .pages(PageSelection::Range(5, 2))
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn builder_rejects_explicit_without_lines() {
        let err = ExtractionConfig::builder()
            .strategy(StrategySettings {
                vertical: DetectionStrategy::Explicit,
                ..StrategySettings::default()
            })
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn builder_defaults() {
        let c = ExtractionConfig::builder().build().unwrap();
        assert!(c.normalize);
        assert_eq!(c.page_error_policy, PageErrorPolicy::Abort);
        assert_eq!(c.download_timeout_secs, 120);
    }
}
