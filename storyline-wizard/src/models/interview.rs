//! Uploaded interview document

use serde::{Deserialize, Serialize};

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Txt,
    Md,
    Docx,
    Pdf,
    /// Accepted, but text extraction is not implemented
    Hwp,
}

impl FileKind {
    /// Detect the kind from a file name's extension (case-insensitive)
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = std::path::Path::new(name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(FileKind::Txt),
            "md" => Some(FileKind::Md),
            "docx" => Some(FileKind::Docx),
            "pdf" => Some(FileKind::Pdf),
            "hwp" => Some(FileKind::Hwp),
            _ => None,
        }
    }
}

/// Interview text decoded from an upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestedFile {
    pub name: String,
    pub kind: FileKind,
    pub size_bytes: usize,
    pub text: String,
    /// Set when the text is a placeholder (decoder unavailable, format unsupported)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}
