//! Recovering plain text from uploaded documents.

#[cfg(feature = "pdf")]
mod pdf;

use std::path::Path;

use tracing::debug;

use crate::error::DocumentError;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Kind of uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// PDF with embedded text.
    Pdf,
    /// Plain text export.
    Text,
}

impl DocumentKind {
    /// Guess the kind from a file name's extension.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" | "text" | "log" | "csv" => Ok(DocumentKind::Text),
            other => Err(DocumentError::UnsupportedType(if other.is_empty() {
                filename.to_string()
            } else {
                other.to_string()
            })),
        }
    }
}

/// Trait for turning document bytes into text.
pub trait DocumentLoader: Send + Sync {
    fn load_text(&self, kind: DocumentKind, data: &[u8]) -> Result<String>;
}

/// Loader for PDFs (when built with the `pdf` feature) and UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLoader;

impl DocumentLoader for TextLoader {
    fn load_text(&self, kind: DocumentKind, data: &[u8]) -> Result<String> {
        if data.is_empty() {
            return Err(DocumentError::Empty);
        }

        let text = match kind {
            DocumentKind::Text => String::from_utf8_lossy(data).into_owned(),
            DocumentKind::Pdf => pdf_text(data)?,
        };

        debug!("Loaded {} characters from {:?} document", text.len(), kind);
        Ok(text)
    }
}

#[cfg(feature = "pdf")]
fn pdf_text(data: &[u8]) -> Result<String> {
    pdf::extract_text(data)
}

#[cfg(not(feature = "pdf"))]
fn pdf_text(_data: &[u8]) -> Result<String> {
    Err(DocumentError::UnsupportedType(
        "pdf (built without PDF support)".to_string(),
    ))
}
