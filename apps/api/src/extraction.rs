//! Resume text extraction for uploaded documents.
//!
//! PDFs go through `pdf-extract`; plain text and markdown are read as UTF-8.
//! PDF parsing is CPU-bound, so `extract_resume_text` runs it inside
//! `tokio::task::spawn_blocking`.

use bytes::Bytes;
use thiserror::Error;

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported resume format: {0}")]
    UnsupportedContentType(String),

    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("resume file is not valid UTF-8 text")]
    InvalidText,

    #[error("no text could be extracted from the resume")]
    EmptyDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

/// Picks the document kind from the declared content type, falling back to the
/// file extension for generic types such as `application/octet-stream`.
pub fn detect_kind(
    content_type: Option<&str>,
    file_name: Option<&str>,
) -> Result<DocumentKind, ExtractionError> {
    let content_type = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .unwrap_or_default();

    match content_type.as_str() {
        "application/pdf" => return Ok(DocumentKind::Pdf),
        "text/plain" | "text/markdown" => return Ok(DocumentKind::PlainText),
        "" | "application/octet-stream" => {}
        other => return Err(ExtractionError::UnsupportedContentType(other.to_string())),
    }

    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => Ok(DocumentKind::Pdf),
        Some("txt") | Some("md") => Ok(DocumentKind::PlainText),
        _ => Err(ExtractionError::UnsupportedContentType(
            file_name.unwrap_or("unknown file").to_string(),
        )),
    }
}

pub async fn extract_resume_text(
    kind: DocumentKind,
    bytes: Bytes,
) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::PlainText => extract_sync(kind, &bytes),
        DocumentKind::Pdf => tokio::task::spawn_blocking(move || extract_sync(kind, &bytes))
            .await
            .map_err(|e| ExtractionError::Pdf(format!("extraction task failed: {e}")))?,
    }
}

fn extract_sync(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractionError> {
    let raw = match kind {
        DocumentKind::Pdf => {
            if !bytes.starts_with(PDF_MAGIC) {
                return Err(ExtractionError::Pdf("file is not a PDF document".to_string()));
            }
            pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| ExtractionError::Pdf(e.to_string()))?
        }
        DocumentKind::PlainText => String::from_utf8(bytes.to_vec())
            .map_err(|_| ExtractionError::InvalidText)?,
    };

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }
    Ok(text)
}

/// Trims each line and collapses runs of blank lines, which PDF extraction
/// produces in bulk.
fn normalize_whitespace(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in raw.lines().map(str::trim) {
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
