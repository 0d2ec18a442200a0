//! PDF text extraction using pdf-extract.

use tracing::trace;

use super::Result;
use crate::error::DocumentError;

/// Extract the embedded text of a PDF.
pub(super) fn extract_text(data: &[u8]) -> Result<String> {
    if !data.starts_with(b"%PDF") {
        return Err(DocumentError::TextExtraction(
            "missing %PDF header".to_string(),
        ));
    }

    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| DocumentError::TextExtraction(e.to_string()))?;
    trace!("pdf-extract returned {} bytes", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf_bytes() {
        assert!(matches!(
            extract_text(b"hello"),
            Err(DocumentError::TextExtraction(_))
        ));
    }
}
