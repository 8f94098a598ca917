//! Document text extraction for uploaded PDF and DOCX files.
//!
//! Extraction never fails outward. A document that cannot be read yields
//! `ExtractedText::Degraded` with the reason, so callers can carry on with empty text
//! while still telling "nothing readable" apart from "the extractor broke".

use serde::Serialize;
use tracing::{debug, warn};

pub mod docx;
pub mod pdf;

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Picks a format from the file name, then the MIME type, then the leading bytes.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>, bytes: &[u8]) -> Option<Self> {
        file_name
            .and_then(Self::from_file_name)
            .or_else(|| content_type.and_then(Self::from_content_type))
            .or_else(|| Self::sniff(bytes))
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type.split(';').next()?.trim();
        if mime.eq_ignore_ascii_case(PDF_MIME) {
            Some(DocumentFormat::Pdf)
        } else if mime.eq_ignore_ascii_case(DOCX_MIME) {
            Some(DocumentFormat::Docx)
        } else {
            None
        }
    }

    /// Magic-byte detection. Any zip container is assumed to be DOCX.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF-") {
            Some(DocumentFormat::Pdf)
        } else if bytes.starts_with(b"PK\x03\x04") {
            Some(DocumentFormat::Docx)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

/// Outcome of extracting text from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedText {
    /// Extraction ran. The text may legitimately be empty (e.g. a scanned PDF).
    Text(String),
    /// Extraction failed; downstream stages should proceed with empty text.
    Degraded {
        format: DocumentFormat,
        reason: String,
    },
}

impl ExtractedText {
    /// The extracted text, or `""` when degraded.
    pub fn into_text(self) -> String {
        match self {
            ExtractedText::Text(text) => text,
            ExtractedText::Degraded { .. } => String::new(),
        }
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            ExtractedText::Text(_) => None,
            ExtractedText::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// Extracts plain text from `bytes` in the given format.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> ExtractedText {
    let result = match format {
        DocumentFormat::Pdf => pdf::extract_text(bytes),
        DocumentFormat::Docx => docx::extract_text(bytes),
    };

    match result {
        Ok(text) => {
            debug!(
                "Extracted {} chars from {} document ({} bytes)",
                text.chars().count(),
                format.as_str(),
                bytes.len()
            );
            ExtractedText::Text(text)
        }
        Err(reason) => {
            warn!(
                "{} text extraction degraded to empty text: {reason}",
                format.as_str()
            );
            ExtractedText::Degraded { format, reason }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_prefers_file_extension() {
        assert_eq!(
            DocumentFormat::detect(Some("CV.PDF"), Some(DOCX_MIME), b""),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::detect(Some("resume.final.docx"), None, b""),
            Some(DocumentFormat::Docx)
        );
    }

    #[test]
    fn test_detect_falls_back_to_content_type_then_magic() {
        assert_eq!(
            DocumentFormat::detect(Some("upload"), Some("application/pdf; charset=binary"), b""),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::detect(None, Some("application/octet-stream"), b"PK\x03\x04rest"),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(
            DocumentFormat::detect(None, None, b"%PDF-1.7\n"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(DocumentFormat::detect(Some("notes.txt"), None, b"hello"), None);
    }

    #[test]
    fn test_corrupted_pdf_degrades_to_empty_text() {
        let result = extract_text(b"%PDF-1.4\nthis is not really a pdf", DocumentFormat::Pdf);
        assert_eq!(result.clone().into_text(), "");
        assert!(result.degraded_reason().is_some());
        assert!(matches!(
            result,
            ExtractedText::Degraded {
                format: DocumentFormat::Pdf,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_buffer_degrades_for_both_formats() {
        for format in [DocumentFormat::Pdf, DocumentFormat::Docx] {
            let result = extract_text(&[], format);
            assert_eq!(result.clone().into_text(), "");
            assert!(result.degraded_reason().is_some());
        }
    }

    #[test]
    fn test_text_variant_is_not_degraded() {
        let result = ExtractedText::Text(String::new());
        assert_eq!(result.degraded_reason(), None);
        assert_eq!(result.clone().into_text(), "");
    }
}
