use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::core::errors::{AppError, AppResult};

pub const EXTRACTION_FAILED: &str = "[EXTRACTION_FAILED]";

/// Text of each page, in page order.
///
/// `pdf-extract` panics on some malformed fonts and streams; a panic is
/// reported as an ordinary extraction error.
pub fn extract_pages(path: &Path) -> AppResult<Vec<String>> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::Io(format!("cannot read PDF: {e}")))?;

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    }));
    match outcome {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(AppError::Pdf(format!("pdf-extract failed: {e}"))),
        Err(_) => Err(AppError::Pdf("pdf-extract panicked".to_string())),
    }
}

/// Pages that carry any text, separated by a blank line.
pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .filter(|page| !page.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Extracted text, or an `[EXTRACTION_FAILED] <reason>` marker.
pub fn text_or_failure(path: &Path) -> (String, bool) {
    match extract_pages(path) {
        Ok(pages) => (join_pages(&pages), true),
        Err(err) => (format!("{EXTRACTION_FAILED} {err}"), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_pages_are_dropped_when_joining() {
        let pages = vec![
            "Page one".to_string(),
            "   \n".to_string(),
            "Page three".to_string(),
        ];
        assert_eq!(join_pages(&pages), "Page one\n\nPage three");
    }

    #[test]
    fn garbage_input_reports_failure_instead_of_panicking() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        std::io::Write::write_all(&mut file, b"this is not a pdf").expect("write");
        let (text, ok) = text_or_failure(file.path());
        assert!(!ok);
        assert!(text.starts_with(EXTRACTION_FAILED));
    }
}
