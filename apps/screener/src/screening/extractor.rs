//! Text Extractor — turns uploaded PDF bytes into plain text.
//!
//! `pdf_extract` can panic on malformed input instead of returning an error,
//! so the call is wrapped in `catch_unwind` and both failure paths map to
//! `AppError::PdfRead`.

use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::errors::AppError;

/// Returns the text of every page, concatenated in page order.
///
/// A PDF with no text layer (a scanned image, say) yields an empty string;
/// the format checker rejects it downstream.
pub fn extract_resume_text(data: &[u8]) -> Result<String, AppError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));

    let pages = match result {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => return Err(AppError::PdfRead(e.to_string())),
        Err(_) => {
            return Err(AppError::PdfRead(
                "PDF extraction panicked (malformed document)".to_string(),
            ))
        }
    };

    debug!("Extracted text from {} page(s)", pages.len());
    Ok(pages.concat())
}
