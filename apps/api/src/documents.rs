//! Resume document text extraction for uploads.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported document type '{0}' (expected .pdf or .txt)")]
    Unsupported(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("document is not valid UTF-8 text")]
    Encoding,

    #[error("document contains no extractable text")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Detects the kind from the content type, then the file extension.
    pub fn detect(filename: Option<&str>, content_type: Option<&str>) -> Result<Self, DocumentError> {
        match content_type {
            Some("application/pdf") => return Ok(DocumentKind::Pdf),
            Some("text/plain") => return Ok(DocumentKind::Text),
            _ => {}
        }

        let extension = filename
            .and_then(|f| f.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" | "md" => Ok(DocumentKind::Text),
            _ => Err(DocumentError::Unsupported(
                filename.unwrap_or("<unnamed>").to_string(),
            )),
        }
    }
}

/// Extracts plain text. PDF parsing runs on the blocking pool.
pub async fn extract_text(kind: DocumentKind, data: Bytes) -> Result<String, DocumentError> {
    let text = match kind {
        DocumentKind::Text => String::from_utf8(data.to_vec()).map_err(|_| DocumentError::Encoding)?,
        DocumentKind::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| DocumentError::Pdf(e.to_string()))
        })
        .await
        .map_err(|e| DocumentError::Pdf(e.to_string()))??,
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(DocumentError::Empty);
    }
    debug!(chars = text.len(), ?kind, "Extracted document text");
    Ok(text)
}
