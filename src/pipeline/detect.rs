//! Table detection seam: a narrow trait over the external detection engine.
//!
//! The detection algorithm itself (edge derivation, intersection clustering,
//! cell grouping) lives entirely in the `pdfplumber` crate and is treated as
//! a black box; this module only forwards strategy options and reshapes the
//! engine's output. Keeping the seam a trait lets the orchestration logic be
//! exercised with fake detectors in tests, independent of any real PDF.

use crate::config::{DetectionStrategy, StrategySettings};
use crate::error::{PageError, Pdf2CsvError};
use pdfplumber::{ExplicitLines, Pdf, Strategy, TableSettings};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One table as returned by the engine: rows of optional cell text, in the
/// order the engine produced them. Never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedTable {
    pub rows: Vec<Vec<Option<String>>>,
}

/// Consumed capability: locate and extract tables per page.
///
/// One call per page, driven from the extraction loop, so the caller can
/// report progress and apply its page-error policy between pages instead of
/// after the whole document has been scanned.
pub trait TableDetector: Send {
    /// Number of pages in the open document.
    fn page_count(&self) -> usize;

    /// Run detection on one 0-based page index.
    fn detect_page(
        &self,
        index: usize,
        settings: &StrategySettings,
    ) -> Result<Vec<DetectedTable>, PageError>;
}

/// Production detector backed by the `pdfplumber` engine.
///
/// Owns the open document for the duration of one run; dropping the detector
/// releases the handle on every exit path.
pub struct PdfplumberDetector {
    pdf: Pdf,
    page_count: usize,
}

impl std::fmt::Debug for PdfplumberDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfplumberDetector")
            .field("page_count", &self.page_count)
            .finish_non_exhaustive()
    }
}

impl PdfplumberDetector {
    /// Open a document, mapping engine failures to [`Pdf2CsvError::CorruptPdf`].
    ///
    /// The engine has no decryption support, so a supplied password is
    /// rejected up front with [`Pdf2CsvError::PasswordUnsupported`] rather
    /// than being silently ignored.
    pub fn open(path: &Path, password: Option<&str>) -> Result<Self, Pdf2CsvError> {
        if password.is_some() {
            return Err(Pdf2CsvError::PasswordUnsupported);
        }
        let pdf = Pdf::open_file(path, None).map_err(|e| Pdf2CsvError::CorruptPdf {
            path: PathBuf::from(path),
            detail: e.to_string(),
        })?;
        let page_count = pdf.page_count();
        debug!("Opened PDF with {} pages", page_count);
        Ok(Self { pdf, page_count })
    }
}

impl TableDetector for PdfplumberDetector {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn detect_page(
        &self,
        index: usize,
        settings: &StrategySettings,
    ) -> Result<Vec<DetectedTable>, PageError> {
        let engine_settings = to_engine_settings(settings);

        // The engine exposes a forward page iterator; `nth` parses lazily up
        // to the requested page and never touches anything past it.
        match self.pdf.pages_iter().nth(index) {
            Some(Ok(page)) => {
                let tables: Vec<DetectedTable> = page
                    .extract_tables(&engine_settings)
                    .into_iter()
                    .map(|rows| DetectedTable { rows })
                    .collect();
                debug!("Page {}: {} table(s)", index + 1, tables.len());
                Ok(tables)
            }
            Some(Err(e)) => Err(PageError::LoadFailed {
                page: index + 1,
                detail: e.to_string(),
            }),
            None => Err(PageError::LoadFailed {
                page: index + 1,
                detail: "page index past end of document".to_string(),
            }),
        }
    }
}

/// Collapse the per-axis strategy pair onto the engine's combined knob.
///
/// The engine models strategy as a single enum: both axes `Text` selects
/// text-alignment detection, either axis `Explicit` selects explicit lines,
/// everything else is ruling-line (lattice) detection. Mixed lines/text pairs
/// therefore fall back to lattice with a warning.
fn to_engine_settings(settings: &StrategySettings) -> TableSettings {
    let strategy = if settings.wants_explicit() {
        Strategy::Explicit
    } else if settings.vertical == DetectionStrategy::Text
        && settings.horizontal == DetectionStrategy::Text
    {
        Strategy::Stream
    } else {
        if settings.vertical != settings.horizontal {
            warn!(
                "Mixed {:?}/{:?} strategy pair: engine supports one combined strategy, \
                 falling back to ruling-line detection",
                settings.vertical, settings.horizontal
            );
        }
        Strategy::Lattice
    };

    let explicit_lines = settings
        .explicit_lines
        .as_ref()
        .map(|(horizontal, vertical)| ExplicitLines {
            horizontal_lines: horizontal.clone(),
            vertical_lines: vertical.clone(),
        });

    TableSettings {
        strategy,
        explicit_lines,
        ..TableSettings::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(v: DetectionStrategy, h: DetectionStrategy) -> StrategySettings {
        StrategySettings {
            vertical: v,
            horizontal: h,
            explicit_lines: None,
        }
    }

    #[test]
    fn open_with_password_is_rejected() {
        // Checked before the engine is invoked, so no real file is needed.
        let err = PdfplumberDetector::open(Path::new("/nonexistent.pdf"), Some("secret"))
            .unwrap_err();
        assert!(matches!(err, Pdf2CsvError::PasswordUnsupported));
    }

    #[test]
    fn lines_pair_maps_to_lattice() {
        let s = to_engine_settings(&pair(DetectionStrategy::Lines, DetectionStrategy::Lines));
        assert!(matches!(s.strategy, Strategy::Lattice));
    }

    #[test]
    fn text_pair_maps_to_stream() {
        let s = to_engine_settings(&pair(DetectionStrategy::Text, DetectionStrategy::Text));
        assert!(matches!(s.strategy, Strategy::Stream));
    }

    #[test]
    fn mixed_pair_falls_back_to_lattice() {
        let s = to_engine_settings(&pair(DetectionStrategy::Lines, DetectionStrategy::Text));
        assert!(matches!(s.strategy, Strategy::Lattice));
    }

    #[test]
    fn explicit_forwards_line_coordinates() {
        let settings = StrategySettings {
            vertical: DetectionStrategy::Explicit,
            horizontal: DetectionStrategy::Explicit,
            explicit_lines: Some((vec![10.0, 30.0], vec![10.0, 60.0, 110.0])),
        };
        let s = to_engine_settings(&settings);
        assert!(matches!(s.strategy, Strategy::Explicit));
        let lines = s.explicit_lines.expect("explicit lines forwarded");
        assert_eq!(lines.horizontal_lines, vec![10.0, 30.0]);
        assert_eq!(lines.vertical_lines, vec![10.0, 60.0, 110.0]);
    }
}
