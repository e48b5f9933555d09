//! Plain-text extraction for uploaded resume files.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Invalid file type '{0}'. Allowed types: PDF (application/pdf), TXT (text/plain)")]
    UnsupportedType(String),

    #[error("File too large. Maximum size is {max_bytes} bytes")]
    TooLarge { max_bytes: usize },

    #[error("Could not read text from the uploaded file: {0}")]
    Unreadable(String),

    #[error("No text could be extracted from the uploaded file")]
    NoText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    PlainText,
}

/// Picks the decoder from the declared content type, falling back to the file
/// extension when the client sent a generic type.
pub fn detect_kind(content_type: Option<&str>, file_name: &str) -> Result<UploadKind, UploadError> {
    let mime = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .unwrap_or_default();
    match mime.as_str() {
        "application/pdf" => return Ok(UploadKind::Pdf),
        "text/plain" => return Ok(UploadKind::PlainText),
        "" | "application/octet-stream" => {}
        other => return Err(UploadError::UnsupportedType(other.to_string())),
    }

    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        Ok(UploadKind::Pdf)
    } else if lower.ends_with(".txt") {
        Ok(UploadKind::PlainText)
    } else {
        Err(UploadError::UnsupportedType(if mime.is_empty() {
            file_name.to_string()
        } else {
            mime
        }))
    }
}

/// Decodes an upload to text with normalized line endings. PDF parsing runs
/// on the blocking pool.
pub async fn extract_upload_text(
    kind: UploadKind,
    data: Bytes,
    max_bytes: usize,
) -> Result<String, UploadError> {
    if data.len() > max_bytes {
        return Err(UploadError::TooLarge { max_bytes });
    }

    let text = match kind {
        UploadKind::PlainText => String::from_utf8_lossy(&data).into_owned(),
        UploadKind::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| UploadError::Unreadable(e.to_string()))?
        .map_err(|e| {
            warn!("PDF text extraction failed: {e}");
            UploadError::Unreadable(e)
        })?,
    };

    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    if text.trim().is_empty() {
        return Err(UploadError::NoText);
    }
    debug!("Extracted {} character(s) from {kind:?} upload", text.len());
    Ok(text)
}
