//! Interview file ingestion
//!
//! Decodes uploads into plain text:
//! - `.txt` / `.md`: UTF-8
//! - `.docx`: text runs of `word/document.xml`, one line per paragraph
//! - `.pdf`: text extraction with the `pdf` feature, placeholder otherwise
//! - `.hwp`: placeholder (not supported yet)

use regex::Regex;
use std::io::{Cursor, Read};
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::{FileKind, IngestedFile};

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File is too large ({size_mb:.1} MB, max {max_mb} MB)")]
    TooLarge { size_mb: f64, max_mb: u64 },

    #[error("File is not valid UTF-8 text: {0}")]
    InvalidUtf8(String),

    #[error("DOCX processing failed: {0}")]
    Docx(String),

    #[error("PDF processing failed: {0}")]
    Pdf(String),
}

/// Reject uploads above `max_mb` megabytes
pub fn validate_file_size(size_bytes: usize, max_mb: u64) -> Result<(), IngestError> {
    let size_mb = size_bytes as f64 / (1024.0 * 1024.0);
    if size_mb > max_mb as f64 {
        return Err(IngestError::TooLarge { size_mb, max_mb });
    }
    Ok(())
}

/// Decode an uploaded file into interview text
pub fn decode_upload(name: &str, bytes: &[u8]) -> Result<IngestedFile, IngestError> {
    let kind = FileKind::from_file_name(name)
        .ok_or_else(|| IngestError::UnsupportedType(name.to_string()))?;

    let (text, notice) = match kind {
        FileKind::Txt | FileKind::Md => (decode_text(bytes)?, None),
        FileKind::Docx => (extract_docx_text(bytes)?, None),
        FileKind::Pdf => extract_pdf_text(bytes)?,
        FileKind::Hwp => (
            "HWP text extraction is not available yet.".to_string(),
            Some("HWP files are not supported yet. Please upload TXT, DOCX or PDF.".to_string()),
        ),
    };

    if let Some(notice) = &notice {
        tracing::warn!(file = %name, "{}", notice);
    }
    tracing::info!(
        file = %name,
        kind = ?kind,
        size_bytes = bytes.len(),
        chars = text.chars().count(),
        "Upload decoded"
    );

    Ok(IngestedFile {
        name: name.to_string(),
        kind,
        size_bytes: bytes.len(),
        text,
        notice,
    })
}

fn decode_text(bytes: &[u8]) -> Result<String, IngestError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| IngestError::InvalidUtf8(e.to_string()))
}

/// Text runs plus the tab and line-break elements between them
fn run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:(tab|br|cr)(?:\s[^>]*)?/>").expect("static regex")
    })
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|lt|gt|quot|apos|amp);").expect("static regex"))
}

/// Named and numeric character references; unknown code points stay as written
fn unescape_xml(s: &str) -> String {
    entity_regex()
        .replace_all(s, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = match name {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => {
                    let code = match name.strip_prefix("#x") {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => name[1..].parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn paragraph_text(para: &str) -> String {
    run_regex()
        .captures_iter(para)
        .map(|c| match (c.get(1), c.get(2).map(|m| m.as_str())) {
            (Some(text), _) => unescape_xml(text.as_str()),
            (None, Some("tab")) => "\t".to_string(),
            _ => "\n".to_string(),
        })
        .collect()
}

/// Paragraph text of a DOCX document, empty paragraphs dropped
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, IngestError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| IngestError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| IngestError::Docx(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| IngestError::Docx(e.to_string()))?;

    let paragraphs: Vec<String> = xml
        .split("</w:p>")
        .map(paragraph_text)
        .filter(|p| !p.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

#[cfg(feature = "pdf")]
fn extract_pdf_text(bytes: &[u8]) -> Result<(String, Option<String>), IngestError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| IngestError::Pdf(e.to_string()))?;
    let pages: Vec<&str> = text.split('\u{c}').map(str::trim).filter(|p| !p.is_empty()).collect();
    Ok((pages.join("\n"), None))
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf_text(_bytes: &[u8]) -> Result<(String, Option<String>), IngestError> {
    Ok((
        "PDF text extraction is not available in this build.".to_string(),
        Some("PDF support is not enabled. Paste the text or upload a TXT file instead.".to_string()),
    ))
}

/// First `limit` characters, with `...` when the text was cut
pub fn preview(text: &str, limit: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(limit) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
