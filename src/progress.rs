//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through each selected page.
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a log, or a database record
//! without the library knowing how the host application communicates. The
//! trait is `Send + Sync` because extraction runs inside `spawn_blocking`.

use std::sync::Arc;

/// Called by the extraction pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Pages are processed strictly in index order, so
/// events arrive in order too.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before any page is scanned.
    ///
    /// * `total_pages` — number of pages that will be processed
    fn on_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page has been scanned successfully.
    ///
    /// * `page_num` — 1-indexed page number
    /// * `tables`   — tables detected on this page
    /// * `rows`     — rows those tables contributed
    fn on_page(&self, page_num: usize, total_pages: usize, tables: usize, rows: usize) {
        let _ = (page_num, total_pages, tables, rows);
    }

    /// Called when detection fails on a page (before the configured policy
    /// decides whether the run continues).
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after all selected pages have been attempted.
    ///
    /// * `processed` — pages scanned without error
    /// * `rows`      — total output rows collected
    fn on_complete(&self, processed: usize, rows: usize) {
        let _ = (processed, rows);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        pages: AtomicUsize,
        errors: AtomicUsize,
        final_rows: AtomicUsize,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_page(&self, _page: usize, _total: usize, _tables: usize, _rows: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_error(&self, _page: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_complete(&self, _processed: usize, rows: usize) {
            self.final_rows.store(rows, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_start(3);
        cb.on_page(1, 3, 2, 10);
        cb.on_page_error(2, 3, "some error");
        cb.on_complete(2, 10);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            pages: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            final_rows: AtomicUsize::new(0),
        };

        tracker.on_start(3);
        tracker.on_page(1, 3, 1, 4);
        tracker.on_page(2, 3, 0, 0);
        tracker.on_page_error(3, 3, "detection failed");
        tracker.on_complete(2, 4);

        assert_eq!(tracker.pages.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.final_rows.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ExtractionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_start(10);
        cb.on_page(1, 10, 1, 5);
    }
}
