//! Input resolution: normalise a user-supplied path or URL to a local file.
//!
//! The detection engine needs a file-system path, so URL inputs are
//! downloaded to a `TempDir` first. The `TempDir` is carried inside
//! [`ResolvedInput`] so cleanup happens automatically when it is dropped,
//! whichever way the run exits. PDF magic bytes (`%PDF`) are validated before
//! returning so callers get a meaningful error rather than an engine failure
//! deep inside parsing.

use crate::error::Pdf2CsvError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The resolved input — either a local path or a downloaded temp file.
#[derive(Debug)]
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; PDF downloaded to a temp directory.
    /// The `TempDir` is kept alive to prevent cleanup until processing completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Get the path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local PDF file path.
///
/// If the input is a URL, download it to a temporary directory. If the input
/// is a local file, validate that it exists and is readable before any parse
/// attempt.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, Pdf2CsvError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Resolve a local file path, validating existence and PDF magic bytes.
fn resolve_local(path_str: &str) -> Result<ResolvedInput, Pdf2CsvError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(Pdf2CsvError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(f) => {
            use std::io::Read;
            // A file shorter than the magic is just as much not-a-PDF as one
            // with the wrong bytes; missing bytes stay zero.
            let mut head = Vec::with_capacity(4);
            let _ = f.take(4).read_to_end(&mut head);
            let mut magic = [0u8; 4];
            magic[..head.len()].copy_from_slice(&head);
            if &magic != b"%PDF" {
                return Err(Pdf2CsvError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2CsvError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Pdf2CsvError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL to a temporary directory and return the path.
///
/// Any HTTP failure mode (connection error, non-2xx status, truncated body)
/// maps to [`Pdf2CsvError::DownloadFailed`]; timeout expiry maps to
/// [`Pdf2CsvError::DownloadTimeout`].
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, Pdf2CsvError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Pdf2CsvError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Pdf2CsvError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Pdf2CsvError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Pdf2CsvError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let filename = filename_from_url(url);

    let temp_dir = TempDir::new().map_err(|e| Pdf2CsvError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Pdf2CsvError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    // Malformed bytes from the server are a remote-resource failure too.
    if bytes.len() < 4 {
        return Err(Pdf2CsvError::DownloadFailed {
            url: url.to_string(),
            reason: format!("Response too short ({} bytes) to be a PDF", bytes.len()),
        });
    }
    if &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(Pdf2CsvError::NotAPdf {
            path: file_path,
            magic,
        });
    }

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| Pdf2CsvError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Extract a reasonable filename from the URL path; used both for the temp
/// file and for default-output-path derivation on URL inputs.
pub fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.pdf".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn missing_local_file_is_not_found() {
        let err = resolve_local("/definitely/not/a/real/file.pdf").unwrap_err();
        assert!(matches!(err, Pdf2CsvError::FileNotFound { .. }));
    }

    #[test]
    fn non_pdf_magic_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"not a pdf at all")
            .unwrap();

        let err = resolve_local(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Pdf2CsvError::NotAPdf { .. }));
    }

    #[test]
    fn file_shorter_than_magic_rejected() {
        let dir = tempfile::tempdir().unwrap();

        let short = dir.path().join("short.pdf");
        std::fs::write(&short, b"%PD").unwrap();
        let err = resolve_local(short.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Pdf2CsvError::NotAPdf { .. }));

        let empty = dir.path().join("empty.pdf");
        std::fs::write(&empty, b"").unwrap();
        let err = resolve_local(empty.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Pdf2CsvError::NotAPdf { .. }));
    }

    #[test]
    fn pdf_magic_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("real.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"%PDF-1.7\n")
            .unwrap();

        let resolved = resolve_local(path.to_str().unwrap()).unwrap();
        assert_eq!(resolved.path(), path);
    }

    #[test]
    fn filename_from_url_uses_last_segment() {
        assert_eq!(
            filename_from_url("https://example.com/reports/q3.pdf"),
            "q3.pdf"
        );
        assert_eq!(
            filename_from_url("https://example.com/api/reports/public/certificate"),
            "downloaded.pdf"
        );
    }
}
